//! User interface module.
//!
//! The tool is non-interactive; `formatter` holds every display function.

pub mod formatter;

pub use formatter::{
    annotation, display_annotation, display_boundary_warning, display_commit_analysis,
    display_error, display_proposed_version, display_status, display_success, AnnotationLevel,
};
