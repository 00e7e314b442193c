//! Next-version resolution
//!
//! A pure function of [VersionFacts], an [Environment] snapshot and the
//! [ResolverSettings]. No I/O happens here.

use semver::{BuildMetadata, Prerelease, Version};

use crate::config::ReleaseConfig;
use crate::domain::prerelease::{branch_prerelease, parse_build, parse_prerelease};
use crate::domain::version::bump;
use crate::domain::{BranchContext, ChangeKind, VersionBump};
use crate::error::{HelmReleaseError, Result};
use crate::history::VersionFacts;

/// Environment variable forcing the branch name
pub const BRANCH_VAR: &str = "HELM_RELEASE_BRANCH";
/// Environment variable forcing a pre-release identifier
pub const PRERELEASE_VAR: &str = "HELM_RELEASE_PRERELEASE";
/// Environment variable supplying build metadata
pub const BUILD_VAR: &str = "HELM_RELEASE_BUILD";

/// Branch variables exported by common CI systems, in lookup order
pub const CI_BRANCH_VARS: &[&str] = &[
    "BRANCH_NAME",
    "GITHUB_HEAD_REF",
    "GITHUB_REF_NAME",
    "CI_COMMIT_REF_NAME",
    "CIRCLE_BRANCH",
    "TRAVIS_BRANCH",
    "BUILDKITE_BRANCH",
];

/// Variables marking a tag-triggered CI build
pub const CI_TAG_BUILD_VARS: &[&str] = &["GITHUB_REF_TYPE", "CI_COMMIT_TAG"];

/// Environment markers captured once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Branch being built, when known from the environment
    pub branch: Option<String>,
    /// Explicit pre-release identifier
    pub prerelease: Option<String>,
    /// Explicit build metadata
    pub build: Option<String>,
}

impl Environment {
    /// Capture markers from the process environment
    pub fn from_env() -> Self {
        Environment::from_lookup(|key| std::env::var(key).ok())
    }

    /// Capture markers through an arbitrary lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // On tag builds these hold the tag name
        let names_tag = |key: &str| match key {
            "GITHUB_REF_NAME" => get("GITHUB_REF_TYPE").is_some_and(|t| t.trim() == "tag"),
            "CI_COMMIT_REF_NAME" => get("CI_COMMIT_TAG").is_some(),
            _ => false,
        };

        let branch = get(BRANCH_VAR).or_else(|| {
            CI_BRANCH_VARS
                .iter()
                .filter(|key| !names_tag(**key))
                .find_map(|key| get(*key))
        });

        Environment {
            branch,
            prerelease: get(PRERELEASE_VAR),
            build: get(BUILD_VAR),
        }
    }
}

/// Settings that shape resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub baseline: String,
    pub release_branches: Vec<String>,
    pub initial_development: bool,
}

impl From<&ReleaseConfig> for ResolverSettings {
    fn from(config: &ReleaseConfig) -> Self {
        ResolverSettings {
            baseline: config.baseline.clone(),
            release_branches: config.release_branches.clone(),
            initial_development: config.initial_development,
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        ResolverSettings::from(&ReleaseConfig::default())
    }
}

/// Computes the next release version
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    settings: ResolverSettings,
}

impl VersionResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        VersionResolver { settings }
    }

    /// Resolve the next version
    ///
    /// 1. No release tag: the baseline, unless tags following the convention
    ///    exist but none of them is a release.
    /// 2. Otherwise the last release bumped by the highest change severity.
    /// 3. Pre-release and build suffixes from the environment decorate the
    ///    numeric core without changing it.
    pub fn resolve(&self, facts: &VersionFacts, env: &Environment) -> Result<Version> {
        let mut version = match facts.last_version() {
            None if !facts.skipped_tags.is_empty() => {
                return Err(HelmReleaseError::unresolvable(format!(
                    "no release tag found, but these tags follow the tag convention: {}",
                    facts.skipped_tags.join(", ")
                )));
            }
            None => self.baseline()?,
            Some(last) => bump(last, self.bump_for(last, facts.change))?,
        };

        version.pre = self.prerelease(facts, env)?;
        version.build = match &env.build {
            Some(build) => parse_build(build)?,
            None => BuildMetadata::EMPTY,
        };

        Ok(version)
    }

    fn baseline(&self) -> Result<Version> {
        let version = Version::parse(self.settings.baseline.trim()).map_err(|e| {
            HelmReleaseError::unresolvable(format!(
                "no release tag found and baseline '{}' is not a version: {}",
                self.settings.baseline, e
            ))
        })?;
        Ok(Version::new(version.major, version.minor, version.patch))
    }

    fn bump_for(&self, last: &Version, change: ChangeKind) -> VersionBump {
        match change.bump() {
            VersionBump::Major if self.settings.initial_development && last.major == 0 => {
                VersionBump::Minor
            }
            other => other,
        }
    }

    fn prerelease(&self, facts: &VersionFacts, env: &Environment) -> Result<Prerelease> {
        if let Some(prerelease) = &env.prerelease {
            return parse_prerelease(prerelease);
        }

        let branch = env.branch.as_ref().or(facts.branch.as_ref());
        match branch {
            Some(name) => {
                let context = BranchContext::new(name.as_str(), &self.settings.release_branches);
                if context.is_release_branch() {
                    Ok(Prerelease::EMPTY)
                } else {
                    branch_prerelease(&context.name, facts.commits_since)
                }
            }
            // Detached HEAD without CI hints, e.g. a tag checkout
            None => Ok(Prerelease::EMPTY),
        }
    }
}
