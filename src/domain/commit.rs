use crate::config::MarkerConfig;
use crate::domain::version::Version;
use crate::error::Result;
use std::fmt;

/// Increment forced by a marker in a commit message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOverride {
    Major,
    Minor,
}

impl fmt::Display for CommitOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitOverride::Major => write!(f, "major"),
            CommitOverride::Minor => write!(f, "minor"),
        }
    }
}

/// Overrides requested by a single commit message, major before minor.
///
/// Each kind fires at most once per message, however many of its markers
/// the message contains.
pub fn markers_in(message: &str, markers: &MarkerConfig) -> Vec<CommitOverride> {
    let mut found = Vec::new();

    if markers.major.iter().any(|m| !m.is_empty() && message.contains(m.as_str())) {
        found.push(CommitOverride::Major);
    }

    if markers.minor.iter().any(|m| !m.is_empty() && message.contains(m.as_str())) {
        found.push(CommitOverride::Minor);
    }

    found
}

/// Apply every marker found in the batch to the version, in message order.
///
/// Returns the overrides that fired; an empty result means the caller's
/// strategy should apply instead. On error the version is left untouched.
pub fn apply_commit_overrides(
    version: &mut Version,
    messages: &[String],
    markers: &MarkerConfig,
) -> Result<Vec<CommitOverride>> {
    let mut next = version.clone();
    let mut fired = Vec::new();

    for message in messages {
        for found in markers_in(message, markers) {
            match found {
                CommitOverride::Major => next.inc_major()?,
                CommitOverride::Minor => next.inc_minor()?,
            }
            fired.push(found);
        }
    }

    *version = next;
    Ok(fired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_markers_in_plain_message() {
        assert!(markers_in("fix: typo", &MarkerConfig::default()).is_empty());
    }

    #[test]
    fn test_markers_in_major() {
        assert_eq!(
            markers_in("feat: new api (bump-major)", &MarkerConfig::default()),
            vec![CommitOverride::Major]
        );
    }

    #[test]
    fn test_markers_in_both_kinds() {
        assert_eq!(
            markers_in("bump-minor and bump-major", &MarkerConfig::default()),
            vec![CommitOverride::Major, CommitOverride::Minor]
        );
    }

    #[test]
    fn test_markers_in_repeated_marker_fires_once() {
        assert_eq!(
            markers_in("bump-major bump-major", &MarkerConfig::default()),
            vec![CommitOverride::Major]
        );
    }

    #[test]
    fn test_markers_match_in_body() {
        let message = "refactor: storage\n\nThis changes the schema.\nbump-minor";
        assert_eq!(
            markers_in(message, &MarkerConfig::default()),
            vec![CommitOverride::Minor]
        );
    }

    #[test]
    fn test_custom_markers() {
        let markers = MarkerConfig {
            major: vec!["[major]".to_string(), "BREAKING".to_string()],
            minor: vec![],
        };
        assert_eq!(
            markers_in("BREAKING: drop v1 endpoints", &markers),
            vec![CommitOverride::Major]
        );
        assert!(markers_in("bump-minor", &markers).is_empty());
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let markers = MarkerConfig {
            major: vec![String::new()],
            minor: vec![],
        };
        assert!(markers_in("anything", &markers).is_empty());
    }

    #[test]
    fn test_apply_no_markers_leaves_version() {
        let mut version = Version::parse("v1.2.3-rc1").unwrap();
        let fired = apply_commit_overrides(
            &mut version,
            &messages(&["fix: a", "chore: b"]),
            &MarkerConfig::default(),
        ).unwrap();
        assert!(fired.is_empty());
        assert_eq!(version.to_string(), "v1.2.3-rc1");
    }

    #[test]
    fn test_apply_major() {
        let mut version = Version::parse("v1.2.3").unwrap();
        let fired = apply_commit_overrides(
            &mut version,
            &messages(&["fix: a", "feat: b bump-major"]),
            &MarkerConfig::default(),
        ).unwrap();
        assert_eq!(fired, vec![CommitOverride::Major]);
        assert_eq!(version.to_string(), "v2.0.0");
    }

    #[test]
    fn test_apply_every_occurrence_counts() {
        let mut version = Version::parse("v1.2.3").unwrap();
        let fired = apply_commit_overrides(
            &mut version,
            &messages(&["bump-minor", "bump-minor"]),
            &MarkerConfig::default(),
        ).unwrap();
        assert_eq!(fired.len(), 2);
        assert_eq!(version.to_string(), "v1.4.0");
    }

    #[test]
    fn test_apply_follows_message_order() {
        let mut major_first = Version::parse("v1.2.3").unwrap();
        apply_commit_overrides(
            &mut major_first,
            &messages(&["bump-major", "bump-minor"]),
            &MarkerConfig::default(),
        ).unwrap();
        assert_eq!(major_first.to_string(), "v2.1.0");

        let mut minor_first = Version::parse("v1.2.3").unwrap();
        apply_commit_overrides(
            &mut minor_first,
            &messages(&["bump-minor", "bump-major"]),
            &MarkerConfig::default(),
        ).unwrap();
        assert_eq!(minor_first.to_string(), "v2.0.0");
    }

    #[test]
    fn test_apply_overflow_leaves_version() {
        let mut version = Version::parse("v1.18446744073709551615.0").unwrap();
        let result = apply_commit_overrides(
            &mut version,
            &messages(&["bump-major", "bump-minor", "bump-minor"]),
            &MarkerConfig::default(),
        );
        assert!(result.is_ok());
        assert_eq!(version.to_string(), "v2.2.0");

        let mut version = Version::parse("v1.18446744073709551615.0").unwrap();
        let result = apply_commit_overrides(
            &mut version,
            &messages(&["bump-minor"]),
            &MarkerConfig::default(),
        );
        assert!(matches!(result, Err(crate::error::BumpError::Version(_))));
        assert_eq!(version.to_string(), "v1.18446744073709551615.0");
    }

    #[test]
    fn test_apply_drops_candidate() {
        let mut version = Version::parse("v0.4.0-rc2_pre3").unwrap();
        apply_commit_overrides(
            &mut version,
            &messages(&["bump-minor"]),
            &MarkerConfig::default(),
        ).unwrap();
        assert_eq!(version.to_string(), "v0.5.0");
    }
}
