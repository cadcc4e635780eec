//! Turns a scan report into an allow/block decision

use std::collections::BTreeSet;

use crate::engine::findings::format_findings;
use crate::engine::scanner::ScanReport;
use crate::output::Decision;

const REMEDIATION: &str = "Load the value at runtime instead (environment variable or secret manager). \
If it is a placeholder, write it as ${API_KEY} or <your-api-key>, or add an exact allowlist entry.";

/// Decide on a write to `path`.
///
/// Findings always block. Rule failures alone block only when
/// `fail_closed` is set.
pub fn decide(path: &str, report: &ScanReport, display_limit: usize, fail_closed: bool) -> Decision {
    if !report.findings.is_empty() {
        let rules: BTreeSet<&str> = report
            .findings
            .iter()
            .map(|f| f.rule_name.as_str())
            .collect();
        let rule_id = match rules.iter().next() {
            Some(only) if rules.len() == 1 => only.to_string(),
            _ => "secrets".to_string(),
        };

        let message = format!(
            "Potential secrets detected in {} ({} finding{}):\n{}\n{}",
            path,
            report.findings.len(),
            if report.findings.len() == 1 { "" } else { "s" },
            format_findings(&report.findings, display_limit),
            REMEDIATION
        );
        return Decision::block(rule_id, message);
    }

    if !report.failures.is_empty() {
        if fail_closed {
            return Decision::block(
                "rule-error",
                format!(
                    "Secret scan of {} could not be completed; the write is blocked until the sentinel configuration is fixed.",
                    path
                ),
            );
        }
        log::warn!(
            "{} secret rule(s) unavailable; allowing write to {}",
            report.failures.len(),
            path
        );
    }

    Decision::allow("no secrets detected")
}
