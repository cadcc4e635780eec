//! Security engine for claude-sentinel
//!
//! Routes file writes to the secret scanner and shell commands to the
//! protected branch guard. The engine holds no mutable state; one value can
//! check any number of requests.

pub mod bash;
pub mod branch;
pub mod context;
pub mod filter;
pub mod findings;
pub mod gate;
pub mod push;
pub mod scanner;
pub mod validators;

use std::time::Duration;

use crate::config::{Config, HookKind};
use crate::input::{ActionKind, InterceptionRequest};
use crate::output::Decision;

use bash::BranchGuard;
use branch::{BranchLookup, FixedBranch, GitBranchLookup};
use filter::FileFilter;
use scanner::{ScanReport, SecretScanner};

/// The main security engine
pub struct SecurityEngine {
    config: Config,
    filter: FileFilter,
    scanner: SecretScanner,
    guard: BranchGuard,
}

impl SecurityEngine {
    /// Compile rules and filters from `config`. Performs no IO.
    pub fn new(config: Config) -> Self {
        let filter = FileFilter::new(&config.secrets);
        let scanner = SecretScanner::new(&config.secrets);
        let guard = BranchGuard::new(&config.branches);

        Self {
            config,
            filter,
            scanner,
            guard,
        }
    }

    /// Check a request, looking up the current branch with git when needed
    pub fn check(&self, request: &InterceptionRequest) -> Decision {
        let lookup = GitBranchLookup::new(Duration::from_millis(
            self.config.branches.lookup_timeout_ms,
        ));
        self.check_with(request, &lookup)
    }

    /// Check a request with an explicit branch lookup
    pub fn check_with(&self, request: &InterceptionRequest, lookup: &dyn BranchLookup) -> Decision {
        if self.config.general.disabled {
            return Decision::allow("sentinel disabled");
        }

        log::debug!("checking {}", request.summary());

        let decision = match request.action {
            ActionKind::FileWrite | ActionKind::FileEdit => self.check_content(
                request.target_path.as_deref().unwrap_or_default(),
                request.proposed_content.as_deref().unwrap_or_default(),
            ),
            ActionKind::Shell => {
                let command = request.command.as_deref().unwrap_or_default();
                match &request.current_branch {
                    Some(branch) => self.check_command(command, &FixedBranch::new(branch.clone())),
                    None => self.check_command(command, lookup),
                }
            }
            ActionKind::Other => Decision::allow("tool not screened"),
        };

        if let Some(rule) = decision.rule_id() {
            log::info!("{} -> {}", request.summary(), rule);
        }

        // If warn-only mode, convert blocks to warnings
        if self.config.general.warn_only {
            return decision.into_warning();
        }

        decision
    }

    /// Screen proposed content for a file
    pub fn check_content(&self, path: &str, content: &str) -> Decision {
        if !self.runs(HookKind::Secrets, self.config.secrets.enabled) {
            return Decision::allow("secret scanning disabled");
        }
        if self.filter.is_skipped(path) {
            return Decision::allow("path not scanned");
        }
        if content.is_empty() {
            return Decision::allow("no content");
        }

        let report = self.scanner.scan(content);
        for finding in &report.findings {
            log::debug!(
                "{}:{} {} {}",
                path,
                finding.line,
                finding.rule_name,
                finding.masked_value
            );
        }

        gate::decide(
            path,
            &report,
            self.config.secrets.display_limit,
            self.config.secrets.fail_closed,
        )
    }

    /// Screen a shell command
    pub fn check_command(&self, command: &str, lookup: &dyn BranchLookup) -> Decision {
        if !self.runs(HookKind::Branches, self.config.branches.enabled) {
            return Decision::allow("branch guard disabled");
        }
        self.guard.check(command, lookup)
    }

    /// Run the secret scanner without the file filter or decision gate
    pub fn scan(&self, content: &str) -> ScanReport {
        self.scanner.scan(content)
    }

    fn runs(&self, kind: HookKind, enabled: bool) -> bool {
        enabled && self.config.general.hook.includes(kind)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
