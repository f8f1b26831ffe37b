//! Pure formatting functions for UI output.
//!
//! Human-readable lines go to stderr; stdout is left to the key-value sink.

use crate::boundary::BoundaryWarning;
use console::style;

/// Severity of a CI workflow annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Error,
}

impl AnnotationLevel {
    fn command(&self) -> &'static str {
        match self {
            AnnotationLevel::Notice => "notice",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Error => "error",
        }
    }
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display the commits scanned for override markers.
///
/// Shows the first line of up to 10 messages; the remainder is counted.
pub fn display_commit_analysis(commit_messages: &[String], revision: &str) {
    eprintln!(
        "\n{}",
        style(format!("Commits since last release up to '{}'", revision)).bold()
    );

    if commit_messages.is_empty() {
        eprintln!("  (none)");
        return;
    }

    for (i, message) in commit_messages.iter().take(10).enumerate() {
        eprintln!("  {}. {}", i + 1, summary_line(message, 60));
    }

    if commit_messages.len() > 10 {
        eprintln!("  ... and {} more commits", commit_messages.len() - 10);
    }
}

/// Display the version change, or the first version when there was none.
pub fn display_proposed_version(old_tag: Option<&str>, new_version: &str) {
    match old_tag {
        Some(old) => {
            eprintln!("\n{}", style("Next Version:").bold());
            eprintln!("  From: {}", style(old).red());
            eprintln!("  To:   {}", style(new_version).green());
        }
        None => {
            eprintln!("\n{}", style("Initial Version:").bold());
            eprintln!("  New version: {}", style(new_version).green());
        }
    }
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print a CI workflow command annotation on stdout.
pub fn display_annotation(level: AnnotationLevel, title: &str, message: &str) {
    println!("{}", annotation(level, title, message));
}

/// Render a CI workflow command, e.g. `::notice title=Version::v1.2.3`.
///
/// Newlines and `%` in the message are percent-escaped so the command stays
/// on one line; `,` and `:` are also escaped in the title.
pub fn annotation(level: AnnotationLevel, title: &str, message: &str) -> String {
    format!(
        "::{} title={}::{}",
        level.command(),
        escape_property(title),
        escape_data(message)
    )
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// First line of a message, cut to at most `max` characters.
fn summary_line(message: &str, max: usize) -> String {
    let first = message.lines().next().unwrap_or_default();
    first.chars().take(max).collect()
}
