//! Secret scanning over proposed file content
//!
//! Every rule is applied to the whole document. A rule that fails to compile
//! is recorded and skipped; the remaining rules still run.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::{CustomRule, SecretsConfig};
use crate::engine::context::LineIndex;
use crate::engine::findings::{self, Finding};
use crate::error::{GuardError, Result};
use crate::rules::allowlist::CompiledAllowlist;
use crate::rules::secrets::BUILTIN_RULES;
use crate::rules::{DetectionRule, Validator};

/// Adjacent quoted literals joined with `+`
static CONCATENATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"\n]*)"\s*\+\s*"([^"\n]*)"|'([^'\n]*)'\s*\+\s*'([^'\n]*)'"#).unwrap()
});

/// Upper bound on concatenation collapse passes
const MAX_COLLAPSE_PASSES: usize = 16;

/// A rule that could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule_name: String,
    pub error: String,
}

/// Outcome of scanning one document
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Deduplicated findings, sorted by line
    pub findings: Vec<Finding>,
    pub failures: Vec<RuleFailure>,
}

struct CompiledRule {
    name: String,
    description: String,
    regex: Regex,
    context: Option<(Regex, usize)>,
    validator: Option<Validator>,
    keywords: Vec<String>,
}

impl CompiledRule {
    fn from_builtin(rule: &DetectionRule, default_radius: usize) -> Result<Self> {
        let regex = Regex::new(rule.pattern).map_err(|e| GuardError::pattern(rule.name, e))?;
        let context = match rule.context {
            Some(ctx) => Some((
                Regex::new(ctx.pattern).map_err(|e| GuardError::pattern(rule.name, e))?,
                ctx.radius.unwrap_or(default_radius),
            )),
            None => None,
        };

        Ok(Self {
            name: rule.name.to_string(),
            description: rule.description.to_string(),
            regex,
            context,
            validator: rule.validator,
            keywords: rule.keywords.iter().map(|k| k.to_string()).collect(),
        })
    }

    fn from_custom(rule: &CustomRule, default_radius: usize) -> Result<Self> {
        let regex = Regex::new(&rule.pattern).map_err(|e| GuardError::pattern(&rule.name, e))?;
        let context = match &rule.context {
            Some(pattern) => Some((
                Regex::new(pattern).map_err(|e| GuardError::pattern(&rule.name, e))?,
                rule.context_radius.unwrap_or(default_radius),
            )),
            None => None,
        };

        Ok(Self {
            name: rule.name.clone(),
            description: rule.description.clone(),
            regex,
            context,
            validator: None,
            keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
        })
    }
}

/// Compiled secret scanner
pub struct SecretScanner {
    rules: Vec<CompiledRule>,
    failures: Vec<RuleFailure>,
    allowlist: CompiledAllowlist,
}

impl SecretScanner {
    /// Build a scanner from the built-in table plus configured custom rules
    pub fn new(config: &SecretsConfig) -> Self {
        Self::with_rules(config, BUILTIN_RULES)
    }

    /// Build a scanner from an explicit built-in table
    pub fn with_rules(config: &SecretsConfig, builtin: &[DetectionRule]) -> Self {
        let radius = config.context_radius;
        let mut rules = Vec::new();
        let mut failures = Vec::new();

        let compiled = builtin
            .iter()
            .map(|r| (r.name.to_string(), CompiledRule::from_builtin(r, radius)))
            .chain(
                config
                    .custom_rules
                    .iter()
                    .map(|r| (r.name.clone(), CompiledRule::from_custom(r, radius))),
            );

        for (name, result) in compiled {
            match result {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    log::error!("secret rule disabled: {}", e);
                    failures.push(RuleFailure {
                        rule_name: name,
                        error: e.to_string(),
                    });
                }
            }
        }

        log::debug!(
            "secret scanner ready: {} rules, {} failed",
            rules.len(),
            failures.len()
        );

        Self {
            rules,
            failures,
            allowlist: CompiledAllowlist::new(&config.allowlist),
        }
    }

    /// Scan a document and report every finding
    pub fn scan(&self, content: &str) -> ScanReport {
        let mut found = self.scan_text(content);

        if let Some(collapsed) = collapse_concatenations(content) {
            log::trace!("rescanning with string concatenations collapsed");
            found.extend(self.scan_text(&collapsed));
        }

        ScanReport {
            findings: findings::dedupe(found),
            failures: self.failures.clone(),
        }
    }

    fn scan_text(&self, text: &str) -> Vec<Finding> {
        let index = LineIndex::new(text);
        let lowered = text.to_lowercase();

        self.rules
            .iter()
            .filter(|rule| {
                rule.keywords.is_empty() || rule.keywords.iter().any(|k| lowered.contains(k))
            })
            .flat_map(|rule| {
                rule.regex
                    .captures_iter(text)
                    .filter_map(|caps| self.evaluate(rule, &caps, &index))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn evaluate(&self, rule: &CompiledRule, caps: &Captures, index: &LineIndex) -> Option<Finding> {
        let whole = caps.get(0)?;
        let value = caps.name("secret").unwrap_or(whole).as_str();
        if value.is_empty() {
            return None;
        }

        if let Some((evidence, radius)) = &rule.context {
            if !index.has_context(whole.start(), *radius, evidence) {
                return None;
            }
        }

        if let Some(validator) = rule.validator {
            if !validator.validate(value, caps) {
                return None;
            }
        }

        if let Some(reason) = self.allowlist.matches(&rule.name, value) {
            log::debug!("{} match suppressed: {}", rule.name, reason);
            return None;
        }

        Some(Finding::new(
            &rule.name,
            value,
            &rule.description,
            index.line_of(whole.start()) + 1,
        ))
    }
}

/// Join `"a" + "b"` style literals until nothing changes.
///
/// Returns `None` when the content has no concatenations.
fn collapse_concatenations(content: &str) -> Option<String> {
    let mut text = content.to_string();
    let mut changed = false;

    for _ in 0..MAX_COLLAPSE_PASSES {
        let next = CONCATENATION
            .replace_all(&text, |caps: &Captures| match (caps.get(1), caps.get(2)) {
                (Some(a), Some(b)) => format!("\"{}{}\"", a.as_str(), b.as_str()),
                _ => format!("'{}{}'", &caps[3], &caps[4]),
            })
            .into_owned();

        if next == text {
            break;
        }
        text = next;
        changed = true;
    }

    changed.then_some(text)
}
