//! Output formatting for Claude Code hook responses
//!
//! Allow and warn decisions are written to stdout as JSON. A block is
//! reported on stderr and signalled with exit status 2.

use serde::Serialize;

/// Exit status for an allowed (or warned) action
pub const EXIT_ALLOW: i32 = 0;

/// Exit status for infrastructure failures
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for a blocked action
pub const EXIT_BLOCK: i32 = 2;

/// Main output structure for Claude Code hooks
#[derive(Debug, Serialize)]
pub struct HookOutput {
    /// Optional system message to show the user
    #[serde(rename = "systemMessage", skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

/// Decision result from the security engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Allow the operation
    Allow { reason: String },

    /// Block the operation
    Block { rule_id: String, message: String },

    /// Report a block but allow (dry-run / warn-only)
    Warn { rule_id: String, message: String },
}

impl Decision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Decision::Allow {
            reason: reason.into(),
        }
    }

    pub fn block(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Decision::Block {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn warn(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Decision::Warn {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block { .. })
    }

    pub fn is_warn(&self) -> bool {
        matches!(self, Decision::Warn { .. })
    }

    /// Get the rule ID if applicable
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Decision::Allow { .. } => None,
            Decision::Block { rule_id, .. } => Some(rule_id),
            Decision::Warn { rule_id, .. } => Some(rule_id),
        }
    }

    /// Reason for an allow, diagnostic for a block or warning
    pub fn message(&self) -> &str {
        match self {
            Decision::Allow { reason } => reason,
            Decision::Block { message, .. } => message,
            Decision::Warn { message, .. } => message,
        }
    }

    /// Downgrade a block to a warning; other decisions are unchanged
    pub fn into_warning(self) -> Self {
        match self {
            Decision::Block { rule_id, message } => Decision::Warn { rule_id, message },
            other => other,
        }
    }

    /// Process exit status for this decision
    pub fn exit_code(&self) -> i32 {
        match self {
            Decision::Block { .. } => EXIT_BLOCK,
            _ => EXIT_ALLOW,
        }
    }

    /// Diagnostic written to stderr on block
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Decision::Block { rule_id, message } => {
                Some(format!("[sentinel:{}] Blocked: {}", rule_id, message))
            }
            _ => None,
        }
    }
}

impl HookOutput {
    /// Create an allow response (empty output = allow)
    pub fn allow() -> Self {
        HookOutput {
            system_message: None,
        }
    }

    /// Create a warn response (allows but shows warning)
    pub fn warn(rule_id: &str, message: &str) -> Self {
        HookOutput {
            system_message: Some(format!("[sentinel:{}] Warning: {}", rule_id, message)),
        }
    }

    /// Stdout payload for a decision; blocks have none
    pub fn from_decision(decision: &Decision) -> Option<Self> {
        match decision {
            Decision::Allow { .. } => Some(HookOutput::allow()),
            Decision::Warn { rule_id, message } => Some(HookOutput::warn(rule_id, message)),
            Decision::Block { .. } => None,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
