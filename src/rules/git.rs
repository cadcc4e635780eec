//! Destructive git operation patterns
//!
//! Patterns run against the subcommand of a single git invocation and the
//! words after it, unquoted and joined with single spaces. Global options
//! are stripped first, so `git -C repo reset --hard` is matched as
//! `reset --hard`. They only block while the current branch is protected.

use crate::rules::GitRule;

/// Anchor every pattern at the subcommand word
macro_rules! git_sub {
    ($rest:literal) => {
        concat!("^", $rest)
    };
}

pub const DESTRUCTIVE_RULES: &[GitRule] = &[
    GitRule::new(
        "reset-hard",
        git_sub!(r"reset\s(?:.*\s)?--hard(?:\s|$)"),
        "git reset --hard discards commits and uncommitted work",
    ),
    GitRule::new(
        "clean-force",
        git_sub!(r"clean\s(?:.*\s)?(?:-[a-zA-Z]*f[a-zA-Z]*|--force)(?:\s|$)"),
        "git clean -f permanently deletes untracked files",
    ),
    GitRule::new(
        "checkout-force",
        git_sub!(r"checkout\s(?:.*\s)?(?:-f|--force)(?:\s|$)"),
        "git checkout --force discards uncommitted changes",
    ),
    GitRule::new(
        "checkout-discard-all",
        git_sub!(r"checkout\s(?:--\s)?\.(?:\s|$)"),
        "git checkout . discards all uncommitted changes",
    ),
    GitRule::new(
        "branch-force-delete",
        git_sub!(
            r"branch\s(?:.*\s)?(?:-D|--delete\s--force|--force\s--delete|-d\s-f|-f\s-d)(?:\s|$)"
        ),
        "git branch -D deletes a branch without checking it is merged",
    ),
    // --force-with-lease and --force-if-includes are not matched
    GitRule::new(
        "push-force",
        git_sub!(r"push\s(?:.*\s)?--force(?:\s|$)"),
        "git push --force rewrites remote history",
    ),
    GitRule::new(
        "push-force-short",
        git_sub!(r"push\s(?:.*\s)?-[a-zA-Z]*f[a-zA-Z]*(?:\s|$)"),
        "git push -f rewrites remote history",
    ),
    GitRule::new(
        "push-force-refspec",
        git_sub!(r"push\s(?:.*\s)?\+\S+"),
        "git push +<refspec> force-updates the remote branch",
    ),
];
