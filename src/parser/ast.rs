//! AST-based shell command extraction using tree-sitter-bash
//!
//! Finds every simple command in a shell string, including commands nested in
//! substitutions, subshells and compound statements, and returns their words
//! with quoting removed (`'gi't push` becomes `git push`).

use tree_sitter::{Node, Parser};

/// A simple command with its words unquoted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Command name followed by its arguments
    pub words: Vec<String>,

    /// Source text of the command
    pub text: String,
}

impl ShellCommand {
    pub fn name(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }
}

/// Parse `source` and collect its simple commands.
///
/// Returns `None` if the grammar cannot be loaded or the source contains
/// syntax errors; callers fall back to operator splitting.
pub fn parse_commands(source: &str) -> Option<Vec<ShellCommand>> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_bash::LANGUAGE.into())
        .ok()?;

    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    if root.has_error() {
        log::debug!("shell parse produced errors");
        return None;
    }

    let mut commands = Vec::new();
    collect_commands(&root, source, &mut commands);
    Some(commands)
}

/// Recursively collect all commands from the AST
fn collect_commands(node: &Node, source: &str, commands: &mut Vec<ShellCommand>) {
    if node.kind() == "command" {
        if let Some(cmd) = extract_command(node, source) {
            commands.push(cmd);
        }
    }

    // Arguments may hold command substitutions
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_commands(&child, source, commands);
    }
}

/// Extract the words of a command node
fn extract_command(node: &Node, source: &str) -> Option<ShellCommand> {
    let text = node.utf8_text(source.as_bytes()).ok()?;

    let mut words = Vec::new();
    let mut seen_name = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "command_name" => {
                seen_name = true;
                let mut inner = child.walk();
                let name = child
                    .children(&mut inner)
                    .next()
                    .map(|n| normalize_word(&n, source))
                    .unwrap_or_else(|| normalize_word(&child, source));
                words.push(name);
            }
            "word" | "string" | "raw_string" | "ansi_c_string" | "concatenation" | "number"
            | "simple_expansion" | "expansion" | "command_substitution"
                if seen_name =>
            {
                words.push(normalize_word(&child, source));
            }
            // Assignments and redirects are not words of the command
            _ => {}
        }
    }

    if words.is_empty() {
        return None;
    }

    Some(ShellCommand {
        words,
        text: text.to_string(),
    })
}

/// Normalize a word (handles quoted strings, concatenations)
fn normalize_word(node: &Node, source: &str) -> String {
    match node.kind() {
        "concatenation" => normalize_concatenation(node, source),
        "string" | "raw_string" | "ansi_c_string" => {
            strip_quotes(node.utf8_text(source.as_bytes()).unwrap_or(""))
        }
        _ => unescape(node.utf8_text(source.as_bytes()).unwrap_or("")),
    }
}

/// Normalize a concatenation node (like gi't' -> git)
fn normalize_concatenation(node: &Node, source: &str) -> String {
    let mut result = String::new();
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        result.push_str(&normalize_word(&child, source));
    }

    result
}

/// Strip quotes from a string
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    let s = s.strip_prefix('$').filter(|r| r.starts_with('\'')).unwrap_or(s);
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Drop backslash escapes from an unquoted word (`ma\in` -> `main`)
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
