use crate::error::{HelmReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// Severity of the changes made since the last release.
///
/// Variants are ordered by severity so that the highest one found in a commit
/// range can be taken with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ChangeKind {
    #[default]
    None,
    Patch,
    Feature,
    Breaking,
}

impl ChangeKind {
    /// The bump this change requires.
    ///
    /// A range without changes still bumps the patch component; the next
    /// release is always a new version.
    pub fn bump(self) -> VersionBump {
        match self {
            ChangeKind::Breaking => VersionBump::Major,
            ChangeKind::Feature => VersionBump::Minor,
            ChangeKind::Patch | ChangeKind::None => VersionBump::Patch,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::None => "none",
            ChangeKind::Patch => "patch",
            ChangeKind::Feature => "feature",
            ChangeKind::Breaking => "breaking",
        };
        f.write_str(name)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

/// Bump the numeric core of a release version.
///
/// Lower components are reset to zero and any pre-release or build metadata is
/// dropped.
pub fn bump(version: &Version, bump_type: VersionBump) -> Result<Version> {
    let overflow =
        || HelmReleaseError::unresolvable(format!("cannot bump {} any further", version));

    let (major, minor, patch) = match bump_type {
        VersionBump::Major => (version.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
        VersionBump::Minor => (
            version.major,
            version.minor.checked_add(1).ok_or_else(overflow)?,
            0,
        ),
        VersionBump::Patch => (
            version.major,
            version.minor,
            version.patch.checked_add(1).ok_or_else(overflow)?,
        ),
    };

    Ok(Version {
        major,
        minor,
        patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    })
}
