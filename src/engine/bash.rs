//! Protected branch guard for shell commands
//!
//! Each git invocation in a command is checked for three things: a
//! destructive operation while a protected branch is checked out, a push
//! whose destination is protected, and deletion of a protected remote branch.

use regex::Regex;
use std::cell::OnceCell;

use crate::config::BranchesConfig;
use crate::engine::branch::BranchLookup;
use crate::engine::push::{self, PushTarget};
use crate::output::Decision;
use crate::parser::{self, wrapper};
use crate::rules::git::DESTRUCTIVE_RULES;
use crate::rules::GitRule;

const REMEDIATION: &str = "Create a feature branch instead (git checkout -b feature/<name>), \
commit there and open a pull request.";

/// Compiled protected branch guard
pub struct BranchGuard {
    protected: Vec<String>,
    wrappers: Vec<String>,
    strict_upstream: bool,
    fail_closed: bool,
    destructive: Vec<(&'static GitRule, Regex)>,
    failed_rules: Vec<&'static str>,
}

/// The current branch, looked up at most once per command
struct CurrentBranch<'a> {
    lookup: &'a dyn BranchLookup,
    cell: OnceCell<Option<String>>,
}

impl<'a> CurrentBranch<'a> {
    fn new(lookup: &'a dyn BranchLookup) -> Self {
        Self {
            lookup,
            cell: OnceCell::new(),
        }
    }

    fn get(&self) -> Option<&str> {
        self.cell
            .get_or_init(|| match self.lookup.current_branch() {
                Ok(branch) => Some(branch),
                Err(e) => {
                    log::debug!("{}; treating as no branch", e);
                    None
                }
            })
            .as_deref()
    }
}

impl BranchGuard {
    pub fn new(config: &BranchesConfig) -> Self {
        Self::with_rules(config, DESTRUCTIVE_RULES)
    }

    pub fn with_rules(config: &BranchesConfig, rules: &'static [GitRule]) -> Self {
        let mut destructive = Vec::new();
        let mut failed_rules = Vec::new();

        for rule in rules {
            match Regex::new(rule.pattern) {
                Ok(re) => destructive.push((rule, re)),
                Err(e) => {
                    log::error!("git rule `{}` disabled: {}", rule.id, e);
                    failed_rules.push(rule.id);
                }
            }
        }

        Self {
            protected: config.protected.clone(),
            wrappers: config.wrappers.clone(),
            strict_upstream: config.strict_upstream,
            fail_closed: config.fail_closed,
            destructive,
            failed_rules,
        }
    }

    pub fn is_protected(&self, branch: &str) -> bool {
        self.protected.iter().any(|p| p == branch)
    }

    /// Check a shell command
    pub fn check(&self, command: &str, lookup: &dyn BranchLookup) -> Decision {
        let invocations: Vec<Vec<String>> = parser::simple_commands(command)
            .iter()
            .map(|words| wrapper::strip_wrappers(words, &self.wrappers).to_vec())
            .filter(|words| words.first().is_some_and(|w| push::is_git(w)))
            .collect();

        if invocations.is_empty() {
            return Decision::allow("no git commands");
        }

        let current = CurrentBranch::new(lookup);
        for words in &invocations {
            if let Some(decision) = self.check_invocation(words, &current) {
                return decision;
            }
        }

        Decision::allow("no protected branch affected")
    }

    fn check_invocation(&self, words: &[String], current: &CurrentBranch<'_>) -> Option<Decision> {
        match push::resolve_push_words(words, &self.protected) {
            PushTarget::Explicit { branches, .. } => {
                for branch in &branches {
                    let name = if branch.name == "HEAD" {
                        match current.get() {
                            Some(name) => name,
                            None => continue,
                        }
                    } else {
                        branch.name.as_str()
                    };

                    if !self.is_protected(name) {
                        continue;
                    }
                    if branch.deleted {
                        return Some(block(
                            "delete-protected-branch",
                            format!("Deleting protected branch '{}' on the remote is blocked.", name),
                        ));
                    }
                    return Some(block(
                        "push-protected-branch",
                        format!("Direct push to protected branch '{}' is blocked.", name),
                    ));
                }
            }
            PushTarget::Unspecified { .. } if self.strict_upstream => {
                if let Some(branch) = current.get().filter(|b| self.is_protected(b)) {
                    return Some(block(
                        "push-protected-branch",
                        format!(
                            "Push without an explicit destination from protected branch '{}' is blocked.",
                            branch
                        ),
                    ));
                }
            }
            _ => {}
        }

        self.check_destructive(words, current)
    }

    /// Destructive operations only matter while a protected branch is checked out
    fn check_destructive(&self, words: &[String], current: &CurrentBranch<'_>) -> Option<Decision> {
        let line = push::git_subcommand(words, 1)
            .map(|sub| words[sub..].join(" "))
            .unwrap_or_default();
        let matched: Vec<&GitRule> = self
            .destructive
            .iter()
            .filter(|(_, re)| re.is_match(&line))
            .map(|(rule, _)| *rule)
            .collect();

        let needs_branch = !matched.is_empty() || (!self.failed_rules.is_empty() && self.fail_closed);
        if !needs_branch {
            return None;
        }

        let branch = current.get().filter(|b| self.is_protected(b))?;

        if let Some(rule) = matched.first() {
            return Some(block(
                rule.id,
                format!("{} (current branch '{}' is protected).", rule.reason, branch),
            ));
        }

        Some(block(
            "rule-error",
            format!(
                "Git command on protected branch '{}' could not be fully checked.",
                branch
            ),
        ))
    }
}

fn block(rule_id: &str, message: String) -> Decision {
    Decision::block(rule_id, format!("{}\n{}", message, REMEDIATION))
}
