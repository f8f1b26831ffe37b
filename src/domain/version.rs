//! Release version value with release-candidate and pre-release counters.
//!
//! The semver prerelease field carries only the release-candidate counter
//! (`rc<N>`) and build metadata carries only the pre-release counter
//! (`pre<N>`). Build metadata is written with `_` instead of `+` so the
//! rendered string stays a valid tag name: `v1.2.3-rc2_pre4`.

use crate::error::{BumpError, Result};
use regex::Regex;
use semver::{BuildMetadata, Prerelease};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Release version parsed from (and rendered back to) a tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    inner: semver::Version,
}

impl Version {
    /// Create a final release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// The starting point when a repository has no release yet
    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    /// Parse a version from a tag string (e.g. "v1.2.3-rc1_pre2")
    ///
    /// Every `_` is read as the build-metadata separator `+`, and one leading
    /// `v` or `V` is optional. The rest must be a standard semantic version.
    pub fn parse(text: &str) -> Result<Self> {
        let normalized = text.replace('_', "+");
        let clean = normalized
            .strip_prefix('v')
            .or_else(|| normalized.strip_prefix('V'))
            .unwrap_or(&normalized);

        let inner = semver::Version::parse(clean)
            .map_err(|e| BumpError::malformed(text, e.to_string()))?;

        Ok(Version { inner })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Release-candidate counter, or 0 when the prerelease field is absent
    /// or does not read `rc<digits>`
    pub fn release_candidate(&self) -> u64 {
        counter(self.inner.pre.as_str(), rc_pattern())
    }

    /// Pre-release counter, or 0 when build metadata is absent or does not
    /// read `pre<digits>`
    pub fn pre_release(&self) -> u64 {
        counter(self.inner.build.as_str(), pre_pattern())
    }

    /// Order two versions.
    ///
    /// Standard semver precedence, except when both sides share
    /// major.minor.patch and their candidate counters differ:
    /// - a final release (counter 0) outranks any of its candidates;
    /// - between two candidates the LOWER counter ranks higher.
    ///
    /// The second rule is intentional; candidates are compared in rollback
    /// order, not in creation order.
    pub fn compare(&self, other: &Version) -> Ordering {
        let same_base = self.major() == other.major()
            && self.minor() == other.minor()
            && self.patch() == other.patch();
        let (rc, other_rc) = (self.release_candidate(), other.release_candidate());

        // Reversed counter order covers both rules: 0 sorts above every
        // candidate, and rc1 sorts above rc2.
        if same_base && rc != other_rc {
            return other_rc.cmp(&rc);
        }

        (
            self.inner.major,
            self.inner.minor,
            self.inner.patch,
            &self.inner.pre,
        )
            .cmp(&(
                other.inner.major,
                other.inner.minor,
                other.inner.patch,
                &other.inner.pre,
            ))
    }

    /// Order two versions by how far along the increments they are.
    ///
    /// Unlike [`Version::compare`], a higher candidate counter is newer, and
    /// the pre-release counter breaks remaining ties. A final release still
    /// follows all of its candidates. Use this to pick the version to build
    /// on, never to rank candidates for rollback.
    pub fn cmp_progress(&self, other: &Version) -> Ordering {
        let key = |v: &Version| {
            let rc = v.release_candidate();
            (v.major(), v.minor(), v.patch(), rc == 0, rc, v.pre_release())
        };

        key(self).cmp(&key(other))
    }

    /// Bump major, reset minor and patch, drop candidate and pre-release
    pub fn inc_major(&mut self) -> Result<()> {
        let major = next_counter(self.inner.major, "major")?;
        self.inner = semver::Version::new(major, 0, 0);
        Ok(())
    }

    /// Bump minor, reset patch, drop candidate and pre-release
    pub fn inc_minor(&mut self) -> Result<()> {
        let minor = next_counter(self.inner.minor, "minor")?;
        self.inner = semver::Version::new(self.inner.major, minor, 0);
        Ok(())
    }

    /// Bump patch, drop candidate and pre-release
    pub fn inc_patch(&mut self) -> Result<()> {
        let patch = next_counter(self.inner.patch, "patch")?;
        self.inner = semver::Version::new(self.inner.major, self.inner.minor, patch);
        Ok(())
    }

    /// Move to the next release candidate.
    ///
    /// A final release first gets a patch bump, so `v1.2.3` becomes
    /// `v1.2.4-rc1`. Pre-release metadata is dropped last.
    pub fn inc_release_candidate(&mut self) -> Result<()> {
        let rc = self.release_candidate();

        let next = next_counter(rc, "release candidate")?;

        if rc == 0 {
            self.inc_patch()?;
        }

        self.inner.pre = Prerelease::new(&format!("rc{}", next))
            .map_err(|e| BumpError::version(e.to_string()))?;
        self.inner.build = BuildMetadata::EMPTY;

        Ok(())
    }

    /// Move to the next pre-release within the current candidate.
    ///
    /// Without a pre-release (or without a candidate to nest it in) a new
    /// candidate is established first and the counter restarts at 1.
    pub fn inc_pre_release(&mut self) -> Result<()> {
        let pre = self.pre_release();

        let next = if pre == 0 || self.release_candidate() == 0 {
            self.inc_release_candidate()?;
            1
        } else {
            next_counter(pre, "pre-release")?
        };

        self.inner.build = BuildMetadata::new(&format!("pre{}", next))
            .map_err(|e| BumpError::version(e.to_string()))?;

        Ok(())
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::zero()
    }
}

impl FromStr for Version {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.inner.to_string().replace('+', "_"))
    }
}

fn next_counter(value: u64, name: &str) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        BumpError::version(format!("{} counter {} cannot be incremented", name, value))
    })
}

fn rc_pattern() -> Option<&'static Regex> {
    static RC: OnceLock<Option<Regex>> = OnceLock::new();
    RC.get_or_init(|| Regex::new(r"^rc(\d+)$").ok()).as_ref()
}

fn pre_pattern() -> Option<&'static Regex> {
    static PRE: OnceLock<Option<Regex>> = OnceLock::new();
    PRE.get_or_init(|| Regex::new(r"^pre(\d+)$").ok()).as_ref()
}

/// Read the digits captured by `pattern` from a semver field, 0 on anything else
fn counter(field: &str, pattern: Option<&Regex>) -> u64 {
    if field.is_empty() {
        return 0;
    }

    pattern
        .and_then(|re| re.captures(field))
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}
