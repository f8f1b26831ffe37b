use crate::config::MarkerConfig;
use crate::domain::{
    apply_commit_overrides, BuildRef, CommitOverride, Strategy, StrategyResolver, Version,
};
use crate::error::Result;
use crate::git::{fetch_release_context, ReleaseContext, ReleaseSource};
use std::fmt;
use tracing::debug;

/// What decided the next version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpDecision {
    /// Commit markers fired; the strategy was not applied
    CommitOverride { major: usize, minor: usize },
    /// No marker fired; the resolved strategy was applied
    Strategy(Strategy),
}

impl fmt::Display for BumpDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpDecision::CommitOverride { major, minor } => write!(
                f,
                "commit markers ({} major, {} minor)",
                major, minor
            ),
            BumpDecision::Strategy(strategy) => write!(f, "strategy {}", strategy),
        }
    }
}

/// Result of one version computation
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    /// Tag the computation started from, `None` without a prior release
    pub previous_tag: Option<String>,
    pub previous: Version,
    pub next: Version,
    pub decision: BumpDecision,
    /// Number of commit messages scanned
    pub commit_count: usize,
}

impl BumpOutcome {
    /// The rendered next version, e.g. "v1.2.4-rc1"
    pub fn version_string(&self) -> String {
        self.next.to_string()
    }
}

/// Computes the next version from a starting version, strategy inputs and
/// commit messages
#[derive(Debug, Clone, Default)]
pub struct VersionAnalyzer {
    resolver: StrategyResolver,
    markers: MarkerConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(resolver: StrategyResolver, markers: MarkerConfig) -> Self {
        VersionAnalyzer { resolver, markers }
    }

    pub fn resolver(&self) -> &StrategyResolver {
        &self.resolver
    }

    /// Apply commit markers, or the strategy when no marker fires.
    ///
    /// Exactly one of the two paths touches the version.
    pub fn compute(
        &self,
        start: Version,
        strategy: Strategy,
        messages: &[String],
    ) -> Result<(Version, BumpDecision)> {
        let mut next = start;

        let fired = apply_commit_overrides(&mut next, messages, &self.markers)?;
        if !fired.is_empty() {
            let major = fired.iter().filter(|o| **o == CommitOverride::Major).count();
            let decision = BumpDecision::CommitOverride {
                major,
                minor: fired.len() - major,
            };
            debug!(%decision, version = %next, "commit markers override strategy");
            return Ok((next, decision));
        }

        strategy.apply(&mut next)?;
        debug!(%strategy, version = %next, "strategy applied");

        Ok((next, BumpDecision::Strategy(strategy)))
    }

    /// Compute the next version for a build from the latest tag.
    ///
    /// A missing tag starts from `v0.0.0`; a tag that is not a version is
    /// rejected as malformed input.
    pub fn analyze(
        &self,
        build_ref: &BuildRef,
        tag: Option<&str>,
        messages: &[String],
    ) -> Result<BumpOutcome> {
        let previous = match tag {
            Some(tag) => Version::parse(tag)?,
            None => Version::zero(),
        };

        self.analyze_context(
            build_ref,
            &ReleaseContext {
                tag: tag.map(str::to_string),
                start: previous,
                messages: messages.to_vec(),
            },
        )
    }

    /// Compute the next version from an already fetched release context
    pub fn analyze_context(
        &self,
        build_ref: &BuildRef,
        context: &ReleaseContext,
    ) -> Result<BumpOutcome> {
        let strategy = self.resolver.resolve(build_ref);
        debug!(%build_ref, %strategy, "strategy resolved");

        let (next, decision) = self.compute(context.start.clone(), strategy, &context.messages)?;

        Ok(BumpOutcome {
            previous_tag: context.tag.clone(),
            previous: context.start.clone(),
            next,
            decision,
            commit_count: context.messages.len(),
        })
    }

    /// Fetch the release context from a source and compute the next version
    pub fn analyze_source<S: ReleaseSource + ?Sized>(
        &self,
        source: &S,
        build_ref: &BuildRef,
        revision: &str,
    ) -> Result<BumpOutcome> {
        let context = fetch_release_context(source, revision)?;
        self.analyze_context(build_ref, &context)
    }
}

/// Render the next version for a starting tag, strategy and commit batch.
///
/// # Example
/// ```ignore
/// let markers = MarkerConfig::default();
/// let next = next_version(Some("v0.0.1-rc1_pre1"), Strategy::BumpRc, &[], &markers)?;
/// assert_eq!(next, "v0.0.1-rc2");
/// ```
pub fn next_version(
    tag: Option<&str>,
    strategy: Strategy,
    messages: &[String],
    markers: &MarkerConfig,
) -> Result<String> {
    let analyzer = VersionAnalyzer::new(
        StrategyResolver::new(strategy, Default::default()),
        markers.clone(),
    );

    Ok(analyzer
        .analyze(&BuildRef::default(), tag, messages)?
        .version_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StrategyTable;
    use crate::error::BumpError;
    use crate::git::InMemorySource;

    fn analyzer() -> VersionAnalyzer {
        VersionAnalyzer::default()
    }

    fn messages(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scenarios() {
        let cases = [
            ("v0.0.0", Strategy::BumpRc, "v0.0.1-rc1"),
            ("v0.0.0", Strategy::BumpPre, "v0.0.1-rc1_pre1"),
            ("v0.0.1-rc1_pre1", Strategy::BumpRc, "v0.0.1-rc2"),
            ("v0.0.1-rc1_pre1", Strategy::BumpMajor, "v1.0.0"),
        ];

        for (have, strategy, want) in cases {
            let next = next_version(Some(have), strategy, &[], &MarkerConfig::default()).unwrap();
            assert_eq!(next, want, "{} + {}", have, strategy);
        }
    }

    #[test]
    fn test_missing_tag_starts_from_zero() {
        let outcome = analyzer()
            .analyze(&BuildRef::branch("qa"), None, &[])
            .unwrap();
        assert_eq!(outcome.previous, Version::zero());
        assert_eq!(outcome.previous_tag, None);
        assert_eq!(outcome.version_string(), "v0.0.1-rc1");
    }

    #[test]
    fn test_commit_override_beats_branch_strategy() {
        let outcome = analyzer()
            .analyze(
                &BuildRef::branch("main"),
                Some("v1.4.2"),
                &messages(&["fix: a", "feat: new api bump-major"]),
            )
            .unwrap();

        assert_eq!(outcome.version_string(), "v2.0.0");
        assert_eq!(
            outcome.decision,
            BumpDecision::CommitOverride { major: 1, minor: 0 }
        );
    }

    #[test]
    fn test_override_skips_explicit_strategy() {
        let analyzer = VersionAnalyzer::new(
            StrategyResolver::new(Strategy::BumpRc, StrategyTable::new()),
            MarkerConfig::default(),
        );
        let outcome = analyzer
            .analyze(
                &BuildRef::branch("qa"),
                Some("v1.0.0"),
                &messages(&["bump-minor"]),
            )
            .unwrap();

        // bump_rc would have produced v1.0.1-rc1
        assert_eq!(outcome.version_string(), "v1.1.0");
    }

    #[test]
    fn test_both_markers_apply_in_order() {
        let outcome = analyzer()
            .analyze(
                &BuildRef::branch("main"),
                Some("v1.2.3"),
                &messages(&["bump-major", "bump-minor"]),
            )
            .unwrap();
        assert_eq!(outcome.version_string(), "v2.1.0");
        assert_eq!(
            outcome.decision,
            BumpDecision::CommitOverride { major: 1, minor: 1 }
        );
    }

    #[test]
    fn test_strategy_applies_without_markers() {
        let outcome = analyzer()
            .analyze(
                &BuildRef::branch("staging"),
                Some("v0.0.1-rc1_pre1"),
                &messages(&["fix: a"]),
            )
            .unwrap();
        assert_eq!(outcome.version_string(), "v0.0.1-rc1_pre2");
        assert_eq!(outcome.decision, BumpDecision::Strategy(Strategy::BumpPre));
        assert_eq!(outcome.commit_count, 1);
    }

    #[test]
    fn test_overflowing_tag_is_an_error() {
        let err = analyzer()
            .analyze(&BuildRef::branch("main"), Some("v1.0.18446744073709551615"), &[])
            .unwrap_err();
        assert!(matches!(err, BumpError::Version(_)));
    }

    #[test]
    fn test_malformed_tag() {
        let err = analyzer()
            .analyze(&BuildRef::branch("main"), Some("release-7"), &[])
            .unwrap_err();
        assert!(matches!(err, BumpError::MalformedInput { .. }));
    }

    #[test]
    fn test_analyze_source() {
        let source = InMemorySource::new()
            .with_tag("v2.3.0")
            .with_messages(["fix: x"]);
        let outcome = analyzer()
            .analyze_source(&source, &BuildRef::branch("qa"), "HEAD")
            .unwrap();

        assert_eq!(outcome.previous_tag.as_deref(), Some("v2.3.0"));
        assert_eq!(outcome.version_string(), "v2.3.1-rc1");
    }

    #[test]
    fn test_analyze_source_without_release_ignores_markers() {
        let source = InMemorySource::new().with_messages(["bump-major"]);
        let outcome = analyzer()
            .analyze_source(&source, &BuildRef::branch("main"), "HEAD")
            .unwrap();

        assert_eq!(outcome.version_string(), "v0.0.1");
        assert_eq!(outcome.decision, BumpDecision::Strategy(Strategy::BumpPatch));
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(
            BumpDecision::Strategy(Strategy::BumpRc).to_string(),
            "strategy bump_rc"
        );
        assert_eq!(
            BumpDecision::CommitOverride { major: 2, minor: 1 }.to_string(),
            "commit markers (2 major, 1 minor)"
        );
    }
}
