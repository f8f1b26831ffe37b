//! Release source abstraction layer
//!
//! The version engine needs two facts from source control: the latest
//! release tag and the commit messages since that tag. This module defines
//! the [ReleaseSource] trait that supplies them, with two implementations:
//!
//! - [repository::Git2Repository]: a local git repository read through `git2`
//! - [memory::InMemorySource]: fixed tags and messages, for offline runs and tests
//!
//! ```rust
//! # use bump_version::git::{fetch_release_context, InMemorySource};
//! # fn example() -> bump_version::Result<()> {
//! let source = InMemorySource::new()
//!     .with_tag("v1.2.3")
//!     .with_messages(["fix: handle empty input"]);
//! let context = fetch_release_context(&source, "HEAD")?;
//! assert_eq!(context.start.to_string(), "v1.2.3");
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod repository;

pub use memory::InMemorySource;
pub use repository::Git2Repository;

use crate::domain::Version;
use crate::error::Result;
use crate::retry::RetryPolicy;
use tracing::debug;

/// Supplies the latest release and the commits made since.
pub trait ReleaseSource {
    /// Name of the latest release tag visible from `revision`
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The tag name as stored in source control
    /// * `Ok(None)` - No release exists yet
    /// * `Err` - If the revision cannot be resolved or reading tags fails
    fn latest_release(&self, revision: &str) -> Result<Option<String>>;

    /// Commit messages reachable from `to_revision` but not from `from_tag`
    ///
    /// Messages are returned oldest first, although the version engine does
    /// not depend on the order.
    fn commit_messages(&self, from_tag: &str, to_revision: &str) -> Result<Vec<String>>;

    /// Update the known tags from a remote before reading them
    fn refresh(&self, _remote: &str, _policy: &RetryPolicy) -> Result<()> {
        Ok(())
    }

    /// Resolve a revision to a stable identifier for reporting
    fn resolve_revision(&self, revision: &str) -> Result<String> {
        Ok(revision.to_string())
    }
}

/// Everything the version engine needs from source control
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseContext {
    /// Tag of the latest release, `None` when the repository has none
    pub tag: Option<String>,
    /// Version parsed from `tag`, or `v0.0.0`
    pub start: Version,
    /// Commit messages since `tag`
    pub messages: Vec<String>,
}

impl ReleaseContext {
    pub fn has_prior_release(&self) -> bool {
        self.tag.is_some()
    }
}

/// Read the latest release and the commits since it.
///
/// Without a prior release the context starts at `v0.0.0` and no commit
/// messages are read.
pub fn fetch_release_context<S: ReleaseSource + ?Sized>(
    source: &S,
    revision: &str,
) -> Result<ReleaseContext> {
    let Some(tag) = source.latest_release(revision)? else {
        debug!(revision, "no prior release found, starting from v0.0.0");
        return Ok(ReleaseContext {
            tag: None,
            start: Version::zero(),
            messages: Vec::new(),
        });
    };

    let start = Version::parse(&tag)?;
    let messages = source.commit_messages(&tag, revision)?;
    debug!(%tag, commits = messages.len(), "release context fetched");

    Ok(ReleaseContext {
        tag: Some(tag),
        start,
        messages,
    })
}
