//! Wrapper command detection and unwrapping
//!
//! Handles commands like sudo, timeout, env, etc. that run another command,
//! so that `sudo -u deploy git push origin main` is checked as `git push`.

use once_cell::sync::Lazy;
use regex::Regex;

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*=").unwrap());

/// Strip leading `VAR=value` words and configured wrapper commands.
///
/// Example: `sudo timeout 30 git reset --hard` -> `git reset --hard`
pub fn strip_wrappers<'a>(words: &'a [String], wrappers: &[String]) -> &'a [String] {
    let mut rest = skip_assignments(words);

    while let Some(first) = rest.first() {
        let name = basename(first);
        if !wrappers.iter().any(|w| w == name) {
            break;
        }

        let args = &rest[1..];
        let skip = match name {
            "sudo" | "doas" => options_len(
                args,
                &[
                    "-u", "--user", "-g", "--group", "-C", "--close-from", "-h", "--host", "-p",
                    "--prompt",
                ],
            ),
            "timeout" => {
                // The first positional is the duration
                let options = options_len(args, &["-s", "--signal", "-k", "--kill-after"]);
                (options + 1).min(args.len())
            }
            "env" => options_len(
                args,
                &["-u", "--unset", "-C", "--chdir", "-S", "--split-string"],
            ),
            "nice" | "ionice" => options_len(args, &["-n", "--adjustment", "-c", "--class", "-p"]),
            "xargs" => options_len(args, &["-n", "-L", "-I", "-E", "-s", "-P", "-d", "-a"]),
            "watch" => options_len(args, &["-n", "--interval"]),
            _ => options_len(args, &[]),
        };

        rest = skip_assignments(&args[skip..]);
    }

    rest
}

/// Number of leading option words, counting values of `takes_value` options
fn options_len(args: &[String], takes_value: &[&str]) -> usize {
    let mut idx = 0;

    while let Some(arg) = args.get(idx) {
        if arg == "--" {
            idx += 1;
            break;
        }
        if !arg.starts_with('-') || arg == "-" {
            break;
        }
        idx += if takes_value.contains(&arg.as_str()) { 2 } else { 1 };
    }

    idx.min(args.len())
}

fn skip_assignments(words: &[String]) -> &[String] {
    let count = words.iter().take_while(|w| ASSIGNMENT.is_match(w)).count();
    &words[count..]
}

/// `/usr/bin/sudo` -> `sudo`
fn basename(word: &str) -> &str {
    word.rsplit('/').next().unwrap_or(word)
}
