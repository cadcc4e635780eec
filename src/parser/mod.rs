//! Shell parsing utilities for claude-sentinel
//!
//! Provides AST-based command extraction with a tokenizing fallback, and
//! wrapper command unwrapping.

pub mod ast;
pub mod shell;
pub mod wrapper;

/// Words of every simple command in `source`
pub fn simple_commands(source: &str) -> Vec<Vec<String>> {
    if let Some(commands) = ast::parse_commands(source) {
        return commands.into_iter().map(|c| c.words).collect();
    }

    log::debug!("falling back to operator splitting");
    shell::split_compound_command(source)
        .iter()
        .map(|segment| shell::tokenize(segment))
        .filter(|words| !words.is_empty())
        .collect()
}
