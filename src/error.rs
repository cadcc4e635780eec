//! Error types for claude-sentinel
//!
//! Internal failures are carried as typed errors and logged. They never reach
//! a user-visible block message; those are templated from rule descriptions.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading configuration, compiling rules or talking to
/// the branch lookup collaborator.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid pattern for `{name}`: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("branch lookup failed: {0}")]
    BranchLookup(String),

    #[error("branch lookup timed out after {}ms", .0.as_millis())]
    BranchLookupTimeout(Duration),
}

impl GuardError {
    pub(crate) fn pattern(name: impl Into<String>, source: regex::Error) -> Self {
        GuardError::Pattern {
            name: name.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
