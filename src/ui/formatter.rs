//! Pure formatting functions for UI output.
//!
//! Styling comes from `console`, which drops colors automatically when the
//! output is not a terminal.

use console::style;
use semver::Version;

use crate::boundary::BoundaryWarning;
use crate::history::VersionFacts;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn format_boundary_warning(warning: &BoundaryWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

/// One line describing the changes since the last release.
///
/// # Examples
///
/// ```ignore
/// "3 commits since v1.2.0 (feature) on feature/login at abc1234"
/// "2 commits, no release tag yet"
/// ```
pub fn format_change_summary(facts: &VersionFacts) -> String {
    let commits = match facts.commits_since {
        1 => "1 commit".to_string(),
        n => format!("{} commits", n),
    };

    let mut line = match &facts.last_release {
        Some(tag) => format!("{} since {} ({})", commits, style(&tag.name).bold(), facts.change),
        None => format!("{}, no release tag yet", commits),
    };
    if let Some(branch) = &facts.branch {
        line.push_str(&format!(" on {}", branch));
    }
    if let Some(head) = &facts.head {
        line.push_str(&format!(" at {}", style(head).dim()));
    }
    line
}

/// Shows either:
/// - If updating: "From: old -> To: new"
/// - If initial: "Initial version: new"
pub fn format_version_change(previous: Option<&Version>, next: &Version) -> String {
    match previous {
        Some(old) => format!(
            "{}\n  From: {}\n  To:   {}",
            style("Version change:").bold(),
            style(old).red(),
            style(next).green()
        ),
        None => format!(
            "{}\n  New version: {}",
            style("Initial version:").bold(),
            style(next).green()
        ),
    }
}
