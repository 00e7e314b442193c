use std::fmt;

/// Warnings that occur when reading release history.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No new commits since the latest release tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// Tag looks like a version tag but cannot be parsed as a semantic version
    UnparsableTag { tag: String, reason: String },
    /// Tracked files differ from HEAD
    DirtyWorkingTree,
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => {
                let short_hash = if current_commit_hash.len() > 7 {
                    &current_commit_hash[..7]
                } else {
                    current_commit_hash.as_str()
                };
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag, short_hash
                )
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Skipping tag '{}': {}", tag, reason)
            }
            BoundaryWarning::DirtyWorkingTree => {
                write!(f, "Working tree has uncommitted changes")
            }
        }
    }
}
