//! Git push target resolution
//!
//! Works out which remote branches a `git push` invocation would update.
//! [`resolve_push`] splits on whitespace, so quoted arguments are not
//! understood; the branch guard passes already-unquoted words to
//! [`resolve_push_words`] instead.

/// Flags of `git push` that consume the following word
const VALUE_FLAGS: &[&str] = &["--repo", "-o", "--push-option", "--receive-pack", "--exec"];

/// Global git options that consume the following word
const GIT_VALUE_OPTIONS: &[&str] = &["-C", "-c", "--git-dir", "--work-tree", "--namespace"];

/// A destination branch named by a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub protected: bool,

    /// The push removes this branch from the remote
    pub deleted: bool,
}

/// Where a command would push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushTarget {
    /// No push in the command
    NotAPush,

    /// No refspec given; git falls back to the configured upstream
    Unspecified { remote: Option<String>, force: bool },

    /// One or more explicit destinations
    Explicit {
        remote: String,
        branches: Vec<BranchRef>,
        delete: bool,
        force: bool,
    },
}

impl PushTarget {
    pub fn is_push(&self) -> bool {
        !matches!(self, PushTarget::NotAPush)
    }

    /// Explicit destinations that are protected
    pub fn protected_branches(&self) -> impl Iterator<Item = &BranchRef> {
        let branches: &[BranchRef] = match self {
            PushTarget::Explicit { branches, .. } => branches,
            _ => &[],
        };
        branches.iter().filter(|b| b.protected)
    }
}

/// Resolve a command line split on whitespace
pub fn resolve_push(command: &str, protected: &[String]) -> PushTarget {
    let words: Vec<&str> = command.split_whitespace().collect();
    resolve_push_words(&words, protected)
}

/// Resolve a command given as separate words
pub fn resolve_push_words<S: AsRef<str>>(words: &[S], protected: &[String]) -> PushTarget {
    let Some(start) = find_push(words) else {
        return PushTarget::NotAPush;
    };

    let mut positionals = Vec::new();
    let mut delete = false;
    let mut force = false;
    let mut options_done = false;

    let mut iter = words[start..].iter().map(AsRef::as_ref);
    while let Some(word) = iter.next() {
        if options_done || word == "-" || !word.starts_with('-') {
            positionals.push(word);
            continue;
        }
        if word == "--" {
            options_done = true;
            continue;
        }
        if VALUE_FLAGS.contains(&word) {
            iter.next();
            continue;
        }

        match word {
            "--delete" => delete = true,
            "--force" => force = true,
            long if long.starts_with("--") => {}
            bundle => {
                let flags = &bundle[1..];
                delete |= flags.contains('d');
                force |= flags.contains('f');
            }
        }
    }

    let mut positionals = positionals.into_iter();
    let Some(remote) = positionals.next() else {
        return PushTarget::Unspecified {
            remote: None,
            force,
        };
    };

    let refspecs: Vec<&str> = positionals.collect();
    if refspecs.is_empty() {
        return PushTarget::Unspecified {
            remote: Some(remote.to_string()),
            force,
        };
    }

    let mut branches = Vec::new();
    for refspec in refspecs {
        force |= refspec.starts_with('+');
        let (name, empty_source) = normalize_refspec(refspec);
        if name.is_empty() {
            continue;
        }
        branches.push(BranchRef {
            protected: protected.iter().any(|p| *p == name),
            deleted: delete || empty_source,
            name,
        });
    }

    PushTarget::Explicit {
        remote: remote.to_string(),
        delete: branches.iter().any(|b| b.deleted),
        branches,
        force,
    }
}

/// Index of the first word after `push` in a `git ... push` sequence
fn find_push<S: AsRef<str>>(words: &[S]) -> Option<usize> {
    words
        .iter()
        .enumerate()
        .filter(|(_, w)| is_git(w.as_ref()))
        .find_map(|(i, _)| push_after_git(words, i + 1))
}

fn push_after_git<S: AsRef<str>>(words: &[S], i: usize) -> Option<usize> {
    git_subcommand(words, i)
        .filter(|&sub| words[sub].as_ref() == "push")
        .map(|sub| sub + 1)
}

/// Index of the subcommand word, skipping git's global options from `start`
pub fn git_subcommand<S: AsRef<str>>(words: &[S], mut i: usize) -> Option<usize> {
    while let Some(word) = words.get(i).map(AsRef::as_ref) {
        if GIT_VALUE_OPTIONS.contains(&word) {
            i += 2;
        } else if word.starts_with('-') {
            i += 1;
        } else {
            return Some(i);
        }
    }
    None
}

/// `git`, optionally path-qualified
pub fn is_git(word: &str) -> bool {
    word == "git" || word.ends_with("/git")
}

/// Destination branch of a refspec, and whether its source is empty
fn normalize_refspec(refspec: &str) -> (String, bool) {
    let refspec = refspec.trim_start_matches('+');
    let (destination, empty_source) = match refspec.split_once(':') {
        Some(("", dst)) => (dst, true),
        Some((src, "")) => (src, false),
        Some((_, dst)) => (dst, false),
        None => (refspec, false),
    };

    let destination = destination.trim_start_matches('+');
    let name = destination
        .strip_prefix("refs/heads/")
        .or_else(|| destination.strip_prefix("heads/"))
        .unwrap_or(destination);

    (name.to_string(), empty_source)
}
