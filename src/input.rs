//! Input parsing for Claude Code hook JSON format
//!
//! Parses the JSON document Claude Code writes to stdin and normalizes it into
//! an [`InterceptionRequest`]. Several historical field spellings are accepted.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::output::Decision;

/// Raw input structure from Claude Code hooks
#[derive(Debug, Deserialize)]
pub struct HookInput {
    /// Name of the tool being invoked (e.g., "Bash", "Edit", "Write")
    #[serde(default, alias = "toolName", alias = "tool")]
    pub tool_name: String,

    /// Tool-specific input parameters
    #[serde(default, alias = "toolInput", alias = "input", alias = "parameters")]
    pub tool_input: Option<ToolInput>,

    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,

    /// Hook event name (e.g., "PreToolUse")
    #[serde(default, alias = "hookEventName")]
    pub hook_event_name: Option<String>,

    /// Branch supplied by the host, skipping the git lookup
    #[serde(default, alias = "currentBranch")]
    pub current_branch: Option<String>,
}

/// Tool-specific input variants, detected by field presence
#[derive(Debug, Clone)]
pub enum ToolInput {
    /// Shell command execution
    Shell { command: String },

    /// Whole-file write
    Write { file_path: String, content: String },

    /// Partial edit; `new_content` holds only the replacement text
    Edit {
        file_path: String,
        new_content: String,
    },

    /// File access without content
    Read { file_path: String },

    /// Unknown tool - pass through
    Unknown { raw: Value },
}

const COMMAND_FIELDS: &[&str] = &["command", "cmd"];
const PATH_FIELDS: &[&str] = &["file_path", "filePath", "path", "notebook_path", "notebookPath"];
const EDIT_FIELDS: &[&str] = &["new_string", "newString"];
const NOTEBOOK_FIELDS: &[&str] = &["new_source", "newSource"];

fn str_field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|n| obj.get(*n).and_then(Value::as_str))
}

impl<'de> Deserialize<'de> for ToolInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        let Some(obj) = value.as_object() else {
            return Ok(ToolInput::Unknown { raw: value });
        };

        if let Some(command) = str_field(obj, COMMAND_FIELDS) {
            return Ok(ToolInput::Shell {
                command: command.to_string(),
            });
        }

        let Some(file_path) = str_field(obj, PATH_FIELDS).map(String::from) else {
            return Ok(ToolInput::Unknown { raw: value });
        };

        // MultiEdit: every replacement is scanned together
        if let Some(edits) = obj.get("edits").and_then(Value::as_array) {
            let new_content = edits
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|edit| str_field(edit, EDIT_FIELDS))
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(ToolInput::Edit {
                file_path,
                new_content,
            });
        }

        if let Some(new_content) =
            str_field(obj, EDIT_FIELDS).or_else(|| str_field(obj, NOTEBOOK_FIELDS))
        {
            return Ok(ToolInput::Edit {
                file_path,
                new_content: new_content.to_string(),
            });
        }

        if let Some(content) = str_field(obj, &["content"]) {
            return Ok(ToolInput::Write {
                file_path,
                content: content.to_string(),
            });
        }

        Ok(ToolInput::Read { file_path })
    }
}

/// What the intercepted tool is about to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    FileWrite,
    FileEdit,
    Shell,
    Other,
}

/// Normalized request handed to the engine
#[derive(Debug, Clone)]
pub struct InterceptionRequest {
    pub action: ActionKind,
    pub tool_name: String,
    pub target_path: Option<String>,
    pub proposed_content: Option<String>,
    pub command: Option<String>,
    pub current_branch: Option<String>,
    pub session_id: Option<String>,
}

impl InterceptionRequest {
    fn new(action: ActionKind, tool_name: &str) -> Self {
        Self {
            action,
            tool_name: tool_name.to_string(),
            target_path: None,
            proposed_content: None,
            command: None,
            current_branch: None,
            session_id: None,
        }
    }

    /// A whole-file write
    pub fn file_write(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target_path: Some(path.into()),
            proposed_content: Some(content.into()),
            ..Self::new(ActionKind::FileWrite, "Write")
        }
    }

    /// A partial edit
    pub fn file_edit(path: impl Into<String>, new_content: impl Into<String>) -> Self {
        Self {
            target_path: Some(path.into()),
            proposed_content: Some(new_content.into()),
            ..Self::new(ActionKind::FileEdit, "Edit")
        }
    }

    /// A shell command
    pub fn shell(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            ..Self::new(ActionKind::Shell, "Bash")
        }
    }

    /// Supply the current branch instead of looking it up
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.current_branch = Some(branch.into());
        self
    }

    /// Get a summary of the request for logging
    pub fn summary(&self) -> String {
        match self.action {
            ActionKind::Shell => {
                let command = self.command.as_deref().unwrap_or_default();
                let truncated: String = command.chars().take(100).collect();
                if truncated.len() < command.len() {
                    format!("{}: {}...", self.tool_name, truncated)
                } else {
                    format!("{}: {}", self.tool_name, truncated)
                }
            }
            ActionKind::FileWrite | ActionKind::FileEdit => format!(
                "{}: {}",
                self.tool_name,
                self.target_path.as_deref().unwrap_or("<no path>")
            ),
            ActionKind::Other => format!("{}: passthrough", self.tool_name),
        }
    }
}

/// Tool names decide the action before field presence does
fn action_by_name(tool_name: &str) -> Option<ActionKind> {
    match tool_name {
        "Write" => Some(ActionKind::FileWrite),
        "Edit" | "MultiEdit" | "NotebookEdit" => Some(ActionKind::FileEdit),
        "Bash" => Some(ActionKind::Shell),
        _ => None,
    }
}

/// Field a named tool cannot do without
fn required_field(tool_name: &str) -> Option<&'static str> {
    match tool_name {
        "Bash" => Some("command"),
        "Write" => Some("content"),
        "Edit" => Some("new_string"),
        "MultiEdit" => Some("edits"),
        _ => None,
    }
}

impl TryFrom<HookInput> for InterceptionRequest {
    type Error = DecodeError;

    fn try_from(input: HookInput) -> Result<Self, Self::Error> {
        let (by_fields, path, content, command) = match input.tool_input {
            Some(ToolInput::Shell { command }) => (ActionKind::Shell, None, None, Some(command)),
            Some(ToolInput::Write { file_path, content }) => {
                (ActionKind::FileWrite, Some(file_path), Some(content), None)
            }
            Some(ToolInput::Edit {
                file_path,
                new_content,
            }) => (ActionKind::FileEdit, Some(file_path), Some(new_content), None),
            Some(ToolInput::Read { file_path }) => (ActionKind::Other, Some(file_path), None, None),
            Some(ToolInput::Unknown { .. }) | None => (ActionKind::Other, None, None, None),
        };

        let action = action_by_name(&input.tool_name).unwrap_or(by_fields);
        let missing = match action {
            ActionKind::Shell => command.is_none(),
            ActionKind::FileWrite | ActionKind::FileEdit => content.is_none(),
            ActionKind::Other => false,
        };
        if let Some(field) = required_field(&input.tool_name).filter(|_| missing) {
            return Err(DecodeError::MissingField {
                tool: input.tool_name,
                field,
            });
        }

        Ok(Self {
            action,
            target_path: path,
            proposed_content: content,
            command,
            current_branch: input.current_branch.filter(|b| !b.trim().is_empty()),
            session_id: input.session_id,
            tool_name: input.tool_name,
        })
    }
}

/// Why the hook input could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("hook input is empty")]
    Empty,

    #[error("hook input is not valid: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{tool} input has no usable `{field}` field")]
    MissingField { tool: String, field: &'static str },
}

/// Decode one hook document
pub fn decode_event(raw: &str) -> Result<InterceptionRequest, DecodeError> {
    if raw.trim().is_empty() {
        return Err(DecodeError::Empty);
    }

    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(DecodeError::Malformed(serde::de::Error::custom(
            "expected a JSON object",
        )));
    }

    let input: HookInput = serde_json::from_value(value)?;
    input.try_into()
}

/// What to do when the input cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPolicy {
    Open,
    Closed,
}

impl FailPolicy {
    pub fn from_fail_closed(fail_closed: bool) -> Self {
        if fail_closed {
            FailPolicy::Closed
        } else {
            FailPolicy::Open
        }
    }

    /// Decision for an undecodable input. The error itself is only logged.
    pub fn on_decode_error(self, err: &DecodeError) -> Decision {
        log::warn!("{}", err);
        match self {
            FailPolicy::Open => Decision::allow("hook input could not be decoded"),
            FailPolicy::Closed => Decision::block(
                "invalid-input",
                "The hook input could not be read, so the action was blocked. Retry the action or check the hook installation.",
            ),
        }
    }
}
