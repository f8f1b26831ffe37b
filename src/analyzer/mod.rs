//! Analysis engine for computing the next version

pub mod version_analyzer;

pub use version_analyzer::{next_version, BumpDecision, BumpOutcome, VersionAnalyzer};
