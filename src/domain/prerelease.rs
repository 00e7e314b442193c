//! Pre-release and build suffixes derived from the environment
//!
//! The numeric core of a version comes from history; these suffixes only
//! decorate it. According to semver.org: https://semver.org/#spec-item-9

use crate::error::{HelmReleaseError, Result};
use semver::{BuildMetadata, Prerelease};

/// Turn a branch name into a valid pre-release identifier.
///
/// Every character outside `[0-9A-Za-z-]` becomes `-`, runs of `-` collapse and
/// the result is lowercased. Purely numeric results get a `branch-` prefix so
/// they never form a numeric identifier with leading zeros.
///
/// # Examples
/// ```
/// use helm_release::domain::prerelease::sanitize_branch;
/// assert_eq!(sanitize_branch("feature/Login_Form"), "feature-login-form");
/// ```
pub fn sanitize_branch(branch: &str) -> String {
    let mut out = String::with_capacity(branch.len());
    for c in branch.chars() {
        let c = if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    let trimmed = out.trim_matches('-');

    if trimmed.is_empty() {
        "branch".to_string()
    } else if trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("branch-{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Pre-release for a build of a non-release branch: `<branch>.<commits>`.
pub fn branch_prerelease(branch: &str, commits_since_release: usize) -> Result<Prerelease> {
    let text = format!("{}.{}", sanitize_branch(branch), commits_since_release);
    parse_prerelease(&text)
}

/// Validate an explicitly supplied pre-release identifier.
pub fn parse_prerelease(text: &str) -> Result<Prerelease> {
    Prerelease::new(text).map_err(|e| {
        HelmReleaseError::unresolvable(format!("invalid pre-release '{}': {}", text, e))
    })
}

/// Validate explicitly supplied build metadata.
pub fn parse_build(text: &str) -> Result<BuildMetadata> {
    BuildMetadata::new(text).map_err(|e| {
        HelmReleaseError::unresolvable(format!("invalid build metadata '{}': {}", text, e))
    })
}
