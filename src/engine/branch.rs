//! Current branch lookup
//!
//! The guard only needs the branch name. A lookup that fails or times out
//! means "not in a repository" and never blocks on its own.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{GuardError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Source of the current branch name
pub trait BranchLookup {
    fn current_branch(&self) -> Result<String>;
}

/// Asks `git rev-parse --abbrev-ref HEAD`, killing it after `timeout`
#[derive(Debug, Clone)]
pub struct GitBranchLookup {
    timeout: Duration,
    workdir: Option<PathBuf>,
}

impl GitBranchLookup {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            workdir: None,
        }
    }

    /// Run the lookup in `dir` instead of the process working directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }
}

impl BranchLookup for GitBranchLookup {
    fn current_branch(&self) -> Result<String> {
        let mut command = Command::new("git");
        command
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let child = command
            .spawn()
            .map_err(|e| GuardError::BranchLookup(format!("failed to run git: {}", e)))?;
        let output = wait_with_timeout(child, self.timeout)?;

        if !output.status.success() {
            return Err(GuardError::BranchLookup(
                "not inside a git work tree".to_string(),
            ));
        }

        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if branch.is_empty() || branch == "HEAD" {
            return Err(GuardError::BranchLookup("detached HEAD".to_string()));
        }

        Ok(branch)
    }
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<Output> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let mut stdout = Vec::new();
                if let Some(mut reader) = child.stdout.take() {
                    reader.read_to_end(&mut stdout).map_err(|e| {
                        GuardError::BranchLookup(format!("failed to read git output: {}", e))
                    })?;
                }
                return Ok(Output {
                    status,
                    stdout,
                    stderr: Vec::new(),
                });
            }
            Ok(None) if start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GuardError::BranchLookupTimeout(timeout));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                return Err(GuardError::BranchLookup(format!(
                    "failed to wait for git: {}",
                    e
                )));
            }
        }
    }
}

/// A branch known up front, e.g. supplied by the host in the hook input
#[derive(Debug, Clone, Default)]
pub struct FixedBranch(pub Option<String>);

impl FixedBranch {
    pub fn new(branch: impl Into<String>) -> Self {
        FixedBranch(Some(branch.into()))
    }

    /// No repository context
    pub fn none() -> Self {
        FixedBranch(None)
    }
}

impl BranchLookup for FixedBranch {
    fn current_branch(&self) -> Result<String> {
        self.0
            .clone()
            .ok_or_else(|| GuardError::BranchLookup("no branch available".to_string()))
    }
}
