//! Main workflow orchestration logic
//!
//! Separates CLI argument parsing from the bump workflow so the workflow can
//! be driven programmatically with any release source and output sink.

use crate::analyzer::{BumpDecision, VersionAnalyzer};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{BuildRef, Version};
use crate::error::Result;
use crate::git::{fetch_release_context, ReleaseSource};
use crate::output::KeyValueSink;
use crate::ui;
use tracing::{debug, info};

/// Arguments for the bump workflow
///
/// Mirrors the CLI Args without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    /// Explicit strategy name; empty or `true` means none
    pub strategy: Option<String>,

    /// Extra `branch=strategy` assignments layered over the config file
    pub strategies_by_branch: Option<String>,

    /// CI ref type (`branch`, `tag`, ...)
    pub ref_type: Option<String>,

    /// Branch or tag name the build runs against
    pub ref_name: Option<String>,

    /// Revision whose history is described
    pub revision: String,

    /// Remote to fetch tags from before reading them
    pub fetch_remote: Option<String>,

    /// Compute and display only, do not emit
    pub dry_run: bool,

    /// Print a CI workflow notice with the computed version
    pub annotations: bool,
}

impl Default for BumpWorkflowArgs {
    fn default() -> Self {
        BumpWorkflowArgs {
            strategy: None,
            strategies_by_branch: None,
            ref_type: None,
            ref_name: None,
            revision: "HEAD".to_string(),
            fetch_remote: None,
            dry_run: false,
            annotations: false,
        }
    }
}

/// Result of a successful bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The computed version, rendered
    pub version: String,

    /// The release tag the computation started from
    pub previous_tag: Option<String>,

    pub decision: BumpDecision,

    /// Whether the version was written to the sink
    pub emitted: bool,

    pub warnings: Vec<BoundaryWarning>,
}

/// Main bump workflow
///
/// 1. Validate strategy names (fails before touching the source)
/// 2. Optionally refresh tags from a remote; failure is a warning
/// 3. Read the latest release and the commits since
/// 4. Compute the next version
/// 5. Emit it under `config.output.key` unless this is a dry run
pub fn run_bump_workflow<S, K>(
    args: &BumpWorkflowArgs,
    config: &Config,
    source: &S,
    sink: &mut K,
) -> Result<WorkflowResult>
where
    S: ReleaseSource + ?Sized,
    K: KeyValueSink + ?Sized,
{
    let resolver = config.strategy_resolver(
        args.strategy.as_deref(),
        args.strategies_by_branch.as_deref(),
    )?;
    let retry_policy = config.retry_policy()?;
    let analyzer = VersionAnalyzer::new(resolver, config.markers.clone());
    let build_ref = BuildRef::from_ci(args.ref_type.as_deref(), args.ref_name.as_deref());
    debug!(%build_ref, revision = %args.revision, "starting bump workflow");

    let mut warnings = Vec::new();

    if let Some(remote) = &args.fetch_remote {
        ui::display_status(&format!("Fetching tags from remote '{}'...", remote));
        match source.refresh(remote, &retry_policy) {
            Ok(()) => ui::display_success("Fetched latest tags"),
            Err(e) => warnings.push(BoundaryWarning::FetchFailed {
                remote: remote.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let context = fetch_release_context(source, &args.revision)?;

    match &context.tag {
        None => warnings.push(BoundaryWarning::NoPriorRelease {
            initial: Version::zero().to_string(),
        }),
        Some(tag) if context.messages.is_empty() => {
            warnings.push(BoundaryWarning::NoNewCommits {
                latest_tag: tag.clone(),
                revision: source.resolve_revision(&args.revision)?,
            })
        }
        Some(_) => ui::display_commit_analysis(&context.messages, &args.revision),
    }

    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }

    let outcome = analyzer.analyze_context(&build_ref, &context)?;
    let version = outcome.version_string();

    ui::display_status(&format!("Decided by {} for {}", outcome.decision, build_ref));
    ui::display_proposed_version(outcome.previous_tag.as_deref(), &version);

    if args.annotations {
        ui::display_annotation(ui::AnnotationLevel::Notice, "Next version", &version);
    }

    let emitted = if args.dry_run {
        ui::display_status(&format!(
            "Dry run: {}={} not written",
            config.output.key, version
        ));
        false
    } else {
        sink.emit(&config.output.key, &version)?;
        info!(key = %config.output.key, %version, "version emitted");
        true
    };

    Ok(WorkflowResult {
        version,
        previous_tag: outcome.previous_tag,
        decision: outcome.decision,
        emitted,
        warnings,
    })
}
