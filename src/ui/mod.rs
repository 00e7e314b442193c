//! User-facing status output.
//!
//! Everything goes to stderr so stdout stays reserved for the version printed
//! in `--print` mode.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Writing formatted lines to the terminal

pub mod formatter;

use console::Term;
use semver::Version;

use crate::boundary::BoundaryWarning;
use crate::history::VersionFacts;

pub use formatter::{
    format_boundary_warning, format_change_summary, format_error, format_status, format_success,
    format_version_change,
};

fn emit(line: &str) {
    // Nothing sensible to do when stderr is gone
    let _ = Term::stderr().write_line(line);
}

/// Print an error message in red.
pub fn display_error(message: &str) {
    emit(&format_error(message));
}

/// Print a success message with a green checkmark.
pub fn display_success(message: &str) {
    emit(&format_success(message));
}

/// Print a status message with a yellow arrow.
pub fn display_status(message: &str) {
    emit(&format_status(message));
}

/// Print a non-fatal history warning.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    emit(&format_boundary_warning(warning));
}

/// Summarize what history says about the next release.
pub fn display_change_summary(facts: &VersionFacts) {
    emit(&format_change_summary(facts));
}

/// Show the version transition (or the initial version).
pub fn display_version_change(previous: Option<&Version>, next: &Version) {
    for line in format_version_change(previous, next).lines() {
        emit(line);
    }
}
