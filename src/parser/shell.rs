//! Shell tokenization fallback
//!
//! Used when tree-sitter cannot parse a command. Splitting is quote-aware but
//! otherwise shallow: substitutions are not descended into.

/// Split a command on `;`, `&&`, `||`, `|`, `&`, newlines and parentheses,
/// ignoring operators inside quotes
pub fn split_compound_command(command: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in command.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }

        match (quote, c) {
            (Some('\''), '\'') => {
                quote = None;
                current.push(c);
            }
            (Some('\''), _) => current.push(c),
            (_, '\\') => {
                escaped = true;
                current.push(c);
            }
            (Some('"'), '"') => {
                quote = None;
                current.push(c);
            }
            (Some(_), _) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, ';' | '&' | '|' | '\n' | '(' | ')' | '`') => {
                push_segment(&mut segments, &mut current);
            }
            (None, _) => current.push(c),
        }
    }
    push_segment(&mut segments, &mut current);

    segments
}

fn push_segment(segments: &mut Vec<String>, current: &mut String) {
    let segment = current.trim();
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }
    current.clear();
}

/// Tokenize a shell command into words
///
/// Uses shlex for proper shell quoting handling, falling back to whitespace
/// splitting when the quoting is unbalanced.
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command)
        .unwrap_or_else(|| command.split_whitespace().map(String::from).collect())
}
