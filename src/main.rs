use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use bump_version::cli::{run_bump_workflow, BumpWorkflowArgs};
use bump_version::config;
use bump_version::git::{Git2Repository, InMemorySource, ReleaseSource};
use bump_version::output::{FileSink, KeyValueSink, WriterSink};
use bump_version::ui;

#[derive(clap::Parser)]
#[command(
    name = "bump-version",
    version,
    about = "Compute the next release version from the latest tag, branch policy and commit markers"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, env = "STRATEGY", help = "Explicit bump strategy")]
    strategy: Option<String>,

    #[arg(
        long,
        env = "STRATEGIES_BY_BRANCH",
        help = "Branch strategies as branch=strategy pairs, comma or newline separated"
    )]
    strategies_by_branch: Option<String>,

    #[arg(long, env = "GITHUB_REF_TYPE", help = "Ref type of the build (branch, tag)")]
    ref_type: Option<String>,

    #[arg(long, env = "GITHUB_REF_NAME", help = "Branch or tag name of the build")]
    ref_name: Option<String>,

    #[arg(long, env = "GITHUB_SHA", default_value = "HEAD", help = "Revision to describe")]
    sha: String,

    #[arg(long, default_value = ".", help = "Path inside the git repository")]
    repo: PathBuf,

    #[arg(
        long,
        env = "GITHUB_OUTPUT",
        help = "File to append key=value output to (stdout if absent)"
    )]
    output: Option<PathBuf>,

    #[arg(long = "fetch", value_name = "REMOTE", help = "Fetch tags from this remote first")]
    fetch: Option<String>,

    #[arg(long, help = "Starting tag; skips reading the repository")]
    tag: Option<String>,

    #[arg(
        short,
        long = "message",
        help = "Commit message since the starting tag (repeatable, offline mode)"
    )]
    messages: Vec<String>,

    #[arg(long, help = "Compute and display the version without emitting it")]
    dry_run: bool,

    #[arg(long, env = "GITHUB_ACTIONS", help = "Print a CI workflow notice with the version")]
    annotations: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    // Offline mode: --tag or --message replaces the repository
    let source: Box<dyn ReleaseSource> = if args.tag.is_some() || !args.messages.is_empty() {
        let mut source = InMemorySource::new().with_messages(args.messages.iter().cloned());
        if let Some(tag) = &args.tag {
            source = source.with_raw_latest(tag.clone());
        }
        Box::new(source)
    } else {
        match Git2Repository::open(&args.repo) {
            Ok(repo) => Box::new(repo),
            Err(e) => {
                ui::display_error(&format!("Git repository error: {}", e));
                std::process::exit(1);
            }
        }
    };

    let mut sink: Box<dyn KeyValueSink> = match &args.output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(WriterSink::stdout()),
    };

    let workflow_args = BumpWorkflowArgs {
        strategy: args.strategy,
        strategies_by_branch: args.strategies_by_branch,
        ref_type: args.ref_type,
        ref_name: args.ref_name,
        revision: args.sha,
        fetch_remote: args.fetch,
        dry_run: args.dry_run,
        annotations: args.annotations,
    };

    match run_bump_workflow(&workflow_args, &config, source.as_ref(), &mut sink) {
        Ok(result) => {
            ui::display_success(&format!("Next version: {}", result.version));
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
