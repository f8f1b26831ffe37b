//! Bump strategies and the rules that pick one for a build

use crate::domain::branch::{BuildRef, RefKind};
use crate::domain::version::Version;
use crate::error::{BumpError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Named policy selecting which single increment applies to a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// No explicit choice; resolution falls through to the branch tables
    #[default]
    Noop,
    BumpRc,
    BumpPatch,
    BumpMinor,
    BumpMajor,
    BumpPre,
}

impl Strategy {
    /// Every selectable strategy, in the order they are documented
    pub const ALL: [Strategy; 5] = [
        Strategy::BumpRc,
        Strategy::BumpPatch,
        Strategy::BumpMinor,
        Strategy::BumpMajor,
        Strategy::BumpPre,
    ];

    /// Configuration name of the strategy
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Noop => "noop",
            Strategy::BumpRc => "bump_rc",
            Strategy::BumpPatch => "bump_patch",
            Strategy::BumpMinor => "bump_minor",
            Strategy::BumpMajor => "bump_major",
            Strategy::BumpPre => "bump_pre",
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Strategy::Noop)
    }

    /// Apply the strategy's increment to a version in place
    pub fn apply(&self, version: &mut Version) -> Result<()> {
        match self {
            Strategy::Noop => {}
            Strategy::BumpRc => version.inc_release_candidate()?,
            Strategy::BumpPatch => version.inc_patch()?,
            Strategy::BumpMinor => version.inc_minor()?,
            Strategy::BumpMajor => version.inc_major()?,
            Strategy::BumpPre => version.inc_pre_release()?,
        }

        Ok(())
    }
}

impl FromStr for Strategy {
    type Err = BumpError;

    /// Parse a strategy name.
    ///
    /// An empty value or a bare `true` (a flag given without a value) means
    /// "no explicit strategy".
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        match name {
            "" | "true" | "noop" => Ok(Strategy::Noop),
            "bump_rc" => Ok(Strategy::BumpRc),
            "bump_patch" => Ok(Strategy::BumpPatch),
            "bump_minor" => Ok(Strategy::BumpMinor),
            "bump_major" => Ok(Strategy::BumpMajor),
            "bump_pre" => Ok(Strategy::BumpPre),
            _ => Err(BumpError::InvalidStrategy(name.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable branch name -> strategy mapping
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StrategyTable {
    entries: BTreeMap<String, Strategy>,
}

impl StrategyTable {
    pub fn new() -> Self {
        StrategyTable::default()
    }

    /// Built-in branch policy used when the caller's table has no opinion
    pub fn builtin() -> Self {
        [
            ("master", Strategy::BumpPatch),
            ("main", Strategy::BumpPatch),
            ("staging", Strategy::BumpPre),
            ("qa", Strategy::BumpRc),
        ]
        .into_iter()
        .collect()
    }

    /// Parse `branch=strategy` pairs separated by commas or newlines
    ///
    /// # Example
    /// ```ignore
    /// let table = StrategyTable::parse_assignments("develop=bump_pre, release=bump_rc")?;
    /// assert_eq!(table.get("develop"), Some(Strategy::BumpPre));
    /// ```
    pub fn parse_assignments(input: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for pair in input
            .split(|c: char| c == ',' || c == '\n')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
        {
            let (branch, strategy) = pair.split_once('=').ok_or_else(|| {
                BumpError::config(format!(
                    "Invalid branch strategy '{}' - expected branch=strategy",
                    pair
                ))
            })?;

            let branch = branch.trim();
            if branch.is_empty() {
                return Err(BumpError::config(format!(
                    "Missing branch name in '{}'",
                    pair
                )));
            }

            entries.insert(branch.to_string(), strategy.parse::<Strategy>()?);
        }

        Ok(StrategyTable { entries })
    }

    /// Build a table from raw configuration strings, validating every name
    pub fn from_names<'a, I>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        names
            .into_iter()
            .map(|(branch, strategy)| Ok((branch.clone(), strategy.parse::<Strategy>()?)))
            .collect::<Result<BTreeMap<String, Strategy>>>()
            .map(|entries| StrategyTable { entries })
    }

    pub fn get(&self, branch: &str) -> Option<Strategy> {
        self.entries.get(branch).copied()
    }

    pub fn insert(&mut self, branch: impl Into<String>, strategy: Strategy) {
        self.entries.insert(branch.into(), strategy);
    }

    /// Entries of `other` replace same-named entries of `self`
    pub fn merged_with(&self, other: &StrategyTable) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().map(|(k, v)| (k.clone(), *v)));
        StrategyTable { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Strategy)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, Strategy)> for StrategyTable {
    fn from_iter<T: IntoIterator<Item = (K, Strategy)>>(iter: T) -> Self {
        StrategyTable {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Pick the strategy for a build. First match wins:
/// 1. an explicit, non-noop strategy;
/// 2. for branch builds, the caller's table, then the built-in table
///    (noop entries fall through);
/// 3. `bump_patch`.
pub fn resolve_strategy(
    explicit: Strategy,
    build_ref: &BuildRef,
    by_branch: &StrategyTable,
    builtin: &StrategyTable,
) -> Strategy {
    if !explicit.is_noop() {
        return explicit;
    }

    if build_ref.kind == RefKind::Branch {
        for table in [by_branch, builtin] {
            if let Some(strategy) = table.get(&build_ref.name).filter(|s| !s.is_noop()) {
                return strategy;
            }
        }
    }

    Strategy::BumpPatch
}

/// Validated strategy inputs for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyResolver {
    pub explicit: Strategy,
    pub by_branch: StrategyTable,
    pub builtin: StrategyTable,
}

impl StrategyResolver {
    pub fn new(explicit: Strategy, by_branch: StrategyTable) -> Self {
        StrategyResolver {
            explicit,
            by_branch,
            builtin: StrategyTable::builtin(),
        }
    }

    pub fn resolve(&self, build_ref: &BuildRef) -> Strategy {
        resolve_strategy(self.explicit, build_ref, &self.by_branch, &self.builtin)
    }
}

impl Default for StrategyResolver {
    fn default() -> Self {
        StrategyResolver::new(Strategy::Noop, StrategyTable::new())
    }
}
