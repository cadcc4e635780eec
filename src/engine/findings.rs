//! Findings, masking and report formatting
//!
//! The raw secret never leaves this module: a [`Finding`] only ever holds the
//! masked form.

use std::collections::HashSet;

/// Characters kept visible at each end of a long value
const MASK_KEEP: usize = 4;

/// Upper bound on the number of mask characters
const MASK_MAX: usize = 8;

/// Values at or below this length are fully masked
const FULL_MASK_LEN: usize = 10;

/// A secret detected in proposed content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub rule_name: String,
    pub masked_value: String,
    pub description: String,

    /// 1-based line of the match
    pub line: usize,
}

impl Finding {
    pub fn new(rule_name: &str, raw_value: &str, description: &str, line: usize) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            masked_value: mask(raw_value),
            description: description.to_string(),
            line,
        }
    }
}

/// Mask a secret for display.
///
/// Short values become eight `*`. Longer values keep four characters at each
/// end, separated by at most eight `*`.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= FULL_MASK_LEN {
        return "*".repeat(MASK_MAX);
    }

    let prefix: String = chars[..MASK_KEEP].iter().collect();
    let suffix: String = chars[chars.len() - MASK_KEEP..].iter().collect();
    let hidden = (chars.len() - 2 * MASK_KEEP).min(MASK_MAX);

    format!("{}{}{}", prefix, "*".repeat(hidden), suffix)
}

/// Sort findings and drop repeats of the same (rule, masked value).
///
/// The result does not depend on the input order.
pub fn dedupe(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by(|a, b| {
        (a.line, &a.rule_name, &a.masked_value).cmp(&(b.line, &b.rule_name, &b.masked_value))
    });

    let mut seen = HashSet::new();
    findings.retain(|f| seen.insert((f.rule_name.clone(), f.masked_value.clone())));
    findings
}

/// Render up to `limit` findings, one per line, with a trailer for the rest
pub fn format_findings(findings: &[Finding], limit: usize) -> String {
    let mut lines: Vec<String> = findings
        .iter()
        .take(limit)
        .map(|f| {
            format!(
                "  - line {}: {} ({}): {}",
                f.line, f.description, f.rule_name, f.masked_value
            )
        })
        .collect();

    if findings.len() > limit {
        lines.push(format!("  ... and {} more", findings.len() - limit));
    }

    lines.join("\n")
}
