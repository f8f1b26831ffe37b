use std::fmt;

/// Non-fatal conditions met while reading release history.
/// These are reported to the user and the run continues.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No release tag exists yet; versioning starts from `initial`
    NoPriorRelease { initial: String },
    /// No new commits since the latest tag
    NoNewCommits { latest_tag: String, revision: String },
    /// Fetching tags from the remote failed; local tags are used
    FetchFailed { remote: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoPriorRelease { initial } => {
                write!(f, "No release tag found, starting from {}", initial)
            }
            BoundaryWarning::NoNewCommits {
                latest_tag,
                revision,
            } => {
                let short: String = revision.chars().take(7).collect();
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag, short
                )
            }
            BoundaryWarning::FetchFailed { remote, reason } => {
                write!(
                    f,
                    "Could not fetch tags from remote '{}', using local tags: {}",
                    remote, reason
                )
            }
        }
    }
}
