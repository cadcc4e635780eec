//! claude-sentinel - Secret scanning and protected branch guard for Claude Code
//!
//! This library provides the checks behind a Claude Code PreToolUse hook:
//! proposed file content is scanned for credentials and personal data, and
//! shell commands are inspected for git operations that would touch a
//! protected branch.
//!
//! # Features
//!
//! - **Secret scanning**: Provider keys, tokens, private keys, card numbers and SSNs
//! - **Validators**: Luhn, JWT claim inspection, base64 re-scan, delimiter balance
//! - **Allowlist support**: Anchored placeholder patterns, optionally per rule
//! - **Push resolution**: Which remote branches a `git push` would update or delete
//! - **Branch guard**: Destructive git operations blocked on protected branches
//! - **Wrapper detection**: Unwraps sudo, timeout, env, etc. to find the real command
//!
//! # Example
//!
//! ```
//! use claude_sentinel::{decode_event, Config, SecurityEngine};
//! use claude_sentinel::engine::branch::FixedBranch;
//!
//! let engine = SecurityEngine::new(Config::default());
//!
//! let input = r#"{"tool_name":"Bash","tool_input":{"command":"git push origin main"}}"#;
//! let request = decode_event(input).unwrap();
//!
//! let decision = engine.check_with(&request, &FixedBranch::new("feature/login"));
//! assert!(decision.is_block());
//! assert_eq!(decision.rule_id(), Some("push-protected-branch"));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod parser;
pub mod rules;

// Re-exports for convenience
pub use config::{Config, HookKind};
pub use engine::push::{resolve_push, PushTarget};
pub use engine::SecurityEngine;
pub use error::{GuardError, Result};
pub use input::{decode_event, DecodeError, FailPolicy, InterceptionRequest};
pub use output::{Decision, HookOutput};
