//! Diagnostic report rendering.

use std::fmt::Write as _;

use colored::Colorize;
use retheme::{Diagnostic, Report, Severity};

/// Renders the report as one `severity  node-id  message` line per record,
/// resolution problems first, then ignored constants, then plain values.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    for diagnostic in report.iter() {
        let _ = writeln!(out, "{}", render_line(diagnostic));
    }
    out
}

fn render_line(diagnostic: &Diagnostic) -> String {
    let label = format!("{:<7}", diagnostic.severity.as_str());
    let label = match diagnostic.severity {
        Severity::Error => label.red().bold(),
        Severity::Warning => label.yellow(),
        Severity::Info => label.blue(),
    };
    format!(
        "{}  {}  {}",
        label,
        diagnostic.node.as_str().dimmed(),
        diagnostic.message
    )
}

/// Renders the report as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// One-line summary of a run.
pub fn summary(report: &Report, roots: usize, replaced: usize) -> String {
    let count = |severity: Severity| report.iter().filter(|d| d.severity == severity).count();
    format!(
        "Rethemed {roots} root(s): {replaced} style(s) replaced, {} error(s), {} warning(s).",
        count(Severity::Error),
        count(Severity::Warning)
    )
}
