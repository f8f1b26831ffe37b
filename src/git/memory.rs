use crate::domain::Version;
use crate::error::{BumpError, Result};
use crate::git::ReleaseSource;
use crate::retry::RetryPolicy;
use std::cell::Cell;

/// Release source backed by fixed data instead of a repository.
///
/// Tags are kept in the order they were added; the most recently added tag
/// that parses as a version is the latest release.
#[derive(Debug, Default)]
pub struct InMemorySource {
    tags: Vec<String>,
    raw_latest: Option<String>,
    messages: Vec<String>,
    unreachable_remote: bool,
    refresh_calls: Cell<u32>,
}

impl InMemorySource {
    /// Create a new empty source
    pub fn new() -> Self {
        InMemorySource::default()
    }

    /// Add a release tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Report `tag` as the latest release verbatim, without checking that it
    /// parses
    pub fn with_raw_latest(mut self, tag: impl Into<String>) -> Self {
        self.raw_latest = Some(tag.into());
        self
    }

    /// Add commit messages made since the latest release
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
        self
    }

    /// Make every refresh fail with a network error
    pub fn with_unreachable_remote(mut self) -> Self {
        self.unreachable_remote = true;
        self
    }

    /// Number of refresh attempts made so far
    pub fn refresh_calls(&self) -> u32 {
        self.refresh_calls.get()
    }
}

impl ReleaseSource for InMemorySource {
    fn latest_release(&self, _revision: &str) -> Result<Option<String>> {
        if let Some(raw) = &self.raw_latest {
            return Ok(Some(raw.clone()));
        }

        Ok(self
            .tags
            .iter()
            .rev()
            .find(|tag| Version::parse(tag).is_ok())
            .cloned())
    }

    fn commit_messages(&self, _from_tag: &str, _to_revision: &str) -> Result<Vec<String>> {
        Ok(self.messages.clone())
    }

    fn refresh(&self, remote: &str, policy: &RetryPolicy) -> Result<()> {
        policy.run(&format!("fetch tags from {}", remote), |_| {
            self.refresh_calls.set(self.refresh_calls.get() + 1);

            if self.unreachable_remote {
                return Err(BumpError::Git(git2::Error::new(
                    git2::ErrorCode::GenericError,
                    git2::ErrorClass::Net,
                    format!("could not resolve remote '{}'", remote),
                )));
            }

            Ok(())
        })
    }
}
