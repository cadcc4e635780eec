//! Allowlist handling for known-safe placeholder values
//!
//! Every pattern is compiled as `^(?:pattern)$`. A value is suppressed only
//! when the whole value matches, so an allowlisted prefix padded with a real
//! secret is still reported.

use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::error::{GuardError, Result};

/// An allowlist entry
#[derive(Debug, Clone, Deserialize)]
pub struct AllowEntry {
    /// Regex describing the whole safe value
    pub pattern: String,

    /// Human-readable reason for allowing
    pub reason: String,

    /// Optional rule restriction (if not set, applies to all rules)
    #[serde(default)]
    pub rule: Option<String>,
}

/// The allowlist file structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AllowlistFile {
    #[serde(default)]
    pub allow: Vec<AllowEntry>,
}

impl AllowlistFile {
    /// Read and parse an allowlist file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GuardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| GuardError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

struct CompiledEntry {
    regex: Regex,
    reason: String,
    rule: Option<String>,
}

/// Compiled allowlist for efficient matching
pub struct CompiledAllowlist {
    entries: Vec<CompiledEntry>,
}

impl CompiledAllowlist {
    /// Create an empty allowlist
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Compile entries, skipping (and logging) any with an invalid pattern
    pub fn new(entries: &[AllowEntry]) -> Self {
        let mut allowlist = Self::empty();

        for entry in entries {
            match anchored(&entry.pattern) {
                Ok(regex) => allowlist.entries.push(CompiledEntry {
                    regex,
                    reason: entry.reason.clone(),
                    rule: entry.rule.clone(),
                }),
                Err(e) => log::warn!("ignoring allowlist entry: {}", e),
            }
        }

        allowlist
    }

    /// Return the reason if `value` is allowlisted for `rule`
    pub fn matches(&self, rule: &str, value: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|e| e.rule.as_deref().map_or(true, |r| r == rule))
            .find(|e| e.regex.is_match(value))
            .map(|e| e.reason.as_str())
    }
}

/// Compile a pattern anchored at both ends
fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| GuardError::pattern(pattern, e))
}
