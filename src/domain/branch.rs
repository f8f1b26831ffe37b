use std::fmt;
use std::str::FromStr;

/// Kind of git ref a build runs against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RefKind {
    Branch,
    Tag,
    #[default]
    Unknown,
    Other(String),
}

impl FromStr for RefKind {
    type Err = std::convert::Infallible;

    /// Parse the CI ref type ("branch", "tag"); anything else is kept as-is
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "branch" => RefKind::Branch,
            "tag" => RefKind::Tag,
            "" => RefKind::Unknown,
            other => RefKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Branch => write!(f, "branch"),
            RefKind::Tag => write!(f, "tag"),
            RefKind::Unknown => write!(f, "unknown"),
            RefKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// The ref a build runs against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildRef {
    pub kind: RefKind,
    pub name: String,
}

impl BuildRef {
    pub fn new(kind: RefKind, name: impl Into<String>) -> Self {
        BuildRef {
            kind,
            name: name.into(),
        }
    }

    /// Create a branch ref
    pub fn branch(name: impl Into<String>) -> Self {
        BuildRef::new(RefKind::Branch, name)
    }

    /// Create a tag ref
    pub fn tag(name: impl Into<String>) -> Self {
        BuildRef::new(RefKind::Tag, name)
    }

    /// Build from the CI ref type and ref name
    pub fn from_ci(ref_type: Option<&str>, ref_name: Option<&str>) -> Self {
        let kind = ref_type
            .map(|t| t.parse().unwrap_or_default())
            .unwrap_or_default();

        BuildRef::new(kind, ref_name.unwrap_or_default())
    }

    pub fn is_branch(&self) -> bool {
        self.kind == RefKind::Branch
    }
}

impl fmt::Display for BuildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} '{}'", self.kind, self.name)
        }
    }
}
