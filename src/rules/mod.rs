//! Detection rules for claude-sentinel
//!
//! Defines the secret detection table, destructive git operation patterns
//! and the placeholder allowlist.

pub mod allowlist;
pub mod git;
pub mod secrets;

/// Secondary evidence that must appear near a primary match
#[derive(Debug, Clone, Copy)]
pub struct ContextRequirement {
    /// Regex that must match within the window
    pub pattern: &'static str,

    /// Line radius; `None` uses the configured default
    pub radius: Option<usize>,
}

/// Post-match semantic filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Payment card checksum
    Luhn,

    /// Three-part dot-delimited token with an inspectable payload
    StructuredToken,

    /// Decode base64 and rescan for high-confidence token prefixes
    Base64Rescan,

    /// `open` and `close` captures must be the same delimiter
    BalancedDelimiter,
}

/// A secret detection rule
#[derive(Debug, Clone)]
pub struct DetectionRule {
    /// Unique identifier for this rule
    pub name: &'static str,

    /// Regex pattern; a `secret` capture narrows the reported value
    pub pattern: &'static str,

    pub context: Option<ContextRequirement>,

    pub validator: Option<Validator>,

    /// Document-wide keywords, at least one required before matching runs
    pub keywords: &'static [&'static str],

    /// Human-readable description used in block messages
    pub description: &'static str,
}

impl DetectionRule {
    /// Create a plain pattern rule
    pub const fn new(
        name: &'static str,
        pattern: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            pattern,
            context: None,
            validator: None,
            keywords: &[],
            description,
        }
    }

    pub const fn with_context(mut self, pattern: &'static str, radius: Option<usize>) -> Self {
        self.context = Some(ContextRequirement { pattern, radius });
        self
    }

    pub const fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub const fn with_keywords(mut self, keywords: &'static [&'static str]) -> Self {
        self.keywords = keywords;
        self
    }
}

/// A destructive command pattern
#[derive(Debug, Clone)]
pub struct GitRule {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Regex pattern matched against a normalized `git ...` command line
    pub pattern: &'static str,

    /// Human-readable reason for blocking
    pub reason: &'static str,
}

impl GitRule {
    pub const fn new(id: &'static str, pattern: &'static str, reason: &'static str) -> Self {
        Self {
            id,
            pattern,
            reason,
        }
    }
}
