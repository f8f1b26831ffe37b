//! Domain logic - pure version rules independent of git and I/O

pub mod branch;
pub mod commit;
pub mod strategy;
pub mod version;

pub use branch::{BuildRef, RefKind};
pub use commit::{apply_commit_overrides, markers_in, CommitOverride};
pub use strategy::{resolve_strategy, Strategy, StrategyResolver, StrategyTable};
pub use version::Version;
