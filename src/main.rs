//! claude-sentinel - Secret scanning and protected branch guard for Claude Code
//!
//! A PreToolUse hook that reads one JSON event from stdin and decides whether
//! the tool call may proceed.
//!
//! # Usage
//!
//! ```bash
//! # As a Claude Code hook (reads JSON from stdin)
//! echo '{"tool_name":"Bash","tool_input":{"command":"git push origin main"}}' | claude-sentinel
//!
//! # Only run the secret scanner
//! claude-sentinel --hook secrets
//!
//! # Dry-run mode (report what would be blocked but allow)
//! claude-sentinel --dry-run
//! ```

use std::env;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use claude_sentinel::{
    config::{Config, HookKind},
    engine::SecurityEngine,
    input::{decode_event, FailPolicy},
    output::{Decision, HookOutput, EXIT_ALLOW, EXIT_FAILURE},
};

/// Print version information
fn print_version() {
    println!("claude-sentinel {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"claude-sentinel - Secret scanning and protected branch guard for Claude Code

USAGE:
    claude-sentinel [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Path to config file
        --hook KIND         Checks to run: secrets, branches, all (default: all)
        --fail-open         Allow when the hook input cannot be read
        --fail-closed       Block when the hook input cannot be read (default)
    -d, --dry-run           Dry-run mode (warn about what would be blocked but allow)
        --log-level LEVEL   Diagnostics on stderr: off, error, warn, info, debug, trace

ENVIRONMENT:
    SENTINEL_DISABLED=1     Disable all checks
    SENTINEL_WARN_ONLY=1    Warn but don't block
    SENTINEL_LOG=LEVEL      Log level when --log-level is not given

EXIT STATUS:
    0   allowed (stdout carries the hook response)
    1   infrastructure failure
    2   blocked (stderr carries the reason)

USAGE AS HOOK:
    Configure in ~/.claude/settings.json:
    {{
      "hooks": {{
        "PreToolUse": [{{
          "matcher": "Write|Edit|MultiEdit|NotebookEdit|Bash",
          "hooks": [{{
            "type": "command",
            "command": "~/.claude/sentinel/claude-sentinel",
            "timeout": 5
          }}]
        }}]
      }}
    }}
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    config_path: Option<String>,
    hook: Option<HookKind>,
    fail_closed: Option<bool>,
    dry_run: bool,
    log_level: Option<LevelFilter>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            config_path: None,
            hook: None,
            fail_closed: None,
            dry_run: false,
            log_level: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-d" | "--dry-run" => result.dry_run = true,
                "--fail-open" => result.fail_closed = Some(false),
                "--fail-closed" => result.fail_closed = Some(true),
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                "--hook" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.hook = HookKind::from_str(&args[i]);
                    }
                }
                "--log-level" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.log_level = args[i].parse().ok();
                    }
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                arg if arg.starts_with("--hook=") => {
                    result.hook = HookKind::from_str(arg.trim_start_matches("--hook="));
                }
                arg if arg.starts_with("--log-level=") => {
                    result.log_level = arg.trim_start_matches("--log-level=").parse().ok();
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Diagnostics go to stderr; stdout is reserved for the hook response
fn init_logging() {
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    ) {
        eprintln!("claude-sentinel: logging unavailable: {}", e);
    }
}

fn load_config(path: Option<&str>) -> Result<Config, i32> {
    let mut config = match path {
        Some(path) => Config::load_from(Path::new(path)).map_err(|e| {
            log::error!("{}", e);
            EXIT_FAILURE
        })?,
        None => Config::load(),
    };

    if let Err(e) = config.merge_allowlist_file() {
        log::warn!("{}; continuing with configured allowlist", e);
    }

    Ok(config)
}

fn emit(decision: &Decision) -> i32 {
    match HookOutput::from_decision(decision) {
        Some(output) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let written = writeln!(handle, "{}", output.to_json()).and_then(|_| handle.flush());
            match written {
                Ok(()) => EXIT_ALLOW,
                Err(e) => {
                    log::error!("failed to write hook response: {}", e);
                    EXIT_FAILURE
                }
            }
        }
        None => {
            if let Some(diagnostic) = decision.diagnostic() {
                eprintln!("{}", diagnostic);
            }
            decision.exit_code()
        }
    }
}

fn run() -> i32 {
    let args = Args::parse();

    // Handle help and version
    if args.help {
        print_help();
        return EXIT_ALLOW;
    }

    if args.version {
        print_version();
        return EXIT_ALLOW;
    }

    init_logging();
    let override_level = args
        .log_level
        .or_else(|| env::var("SENTINEL_LOG").ok().and_then(|l| l.parse().ok()));
    log::set_max_level(override_level.unwrap_or(LevelFilter::Warn));

    let mut config = match load_config(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    if override_level.is_none() {
        match config.general.log_level.parse() {
            Ok(level) => log::set_max_level(level),
            Err(_) => log::warn!("unknown log level `{}`", config.general.log_level),
        }
    }

    if let Some(hook) = args.hook {
        config.general.hook = hook;
    }
    if let Some(fail_closed) = args.fail_closed {
        config.general.fail_closed = fail_closed;
    }
    if args.dry_run || env_flag("SENTINEL_WARN_ONLY") {
        config.general.warn_only = true;
    }
    if env_flag("SENTINEL_DISABLED") {
        config.general.disabled = true;
    }

    let policy = FailPolicy::from_fail_closed(config.general.fail_closed);
    let warn_only = config.general.warn_only;
    let disabled = config.general.disabled;

    // Read JSON from stdin
    let mut raw = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut raw) {
        log::warn!("failed to read stdin: {}", e);
        raw.clear();
    }

    let decision = match decode_event(&raw) {
        Ok(request) => SecurityEngine::new(config).check(&request),
        Err(_) if disabled => Decision::allow("sentinel disabled"),
        Err(e) => {
            let decision = policy.on_decode_error(&e);
            if warn_only {
                decision.into_warning()
            } else {
                decision
            }
        }
    };

    emit(&decision)
}

fn main() {
    process::exit(run());
}
