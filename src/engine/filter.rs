//! File filtering before secret scanning
//!
//! Binary formats, dependency trees, lock files and example templates are
//! never scanned.

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

use crate::config::SecretsConfig;

pub struct FileFilter {
    extensions: HashSet<String>,
    paths: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &SecretsConfig) -> Self {
        let extensions = config
            .skip_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        let paths = config
            .skip_paths
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("ignoring skip path `{}`: {}", p, e);
                    None
                }
            })
            .collect();

        Self { extensions, paths }
    }

    /// Check if a path should not be scanned. An empty path is always skipped.
    pub fn is_skipped(&self, path: &str) -> bool {
        let path = path.trim();
        if path.is_empty() {
            return true;
        }

        let normalized = path.replace('\\', "/");

        let skipped_extension = Path::new(&normalized)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false);

        skipped_extension || self.paths.iter().any(|re| re.is_match(&normalized))
    }
}
