use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{HelmReleaseError, Result};

/// Dotted path of the image tag in `values.yaml` when none is configured.
pub const DEFAULT_TAG_PATH: &str = "image.tag";

/// Version used when the repository has no release tag yet.
pub const DEFAULT_BASELINE: &str = "0.1.0";

/// Represents the complete configuration for helm-release.
///
/// Contains release resolution settings, the values file layout, and the
/// conventional commit rules used to classify changes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub values: ValuesConfig,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,
}

fn default_baseline() -> String {
    DEFAULT_BASELINE.to_string()
}

/// Returns the default tag naming patterns, tried in order.
fn default_tag_patterns() -> Vec<String> {
    vec!["v{version}".to_string(), "{version}".to_string()]
}

/// Returns the branches whose builds produce plain releases.
fn default_release_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

/// Settings for turning history into a version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Version proposed when no release tag exists
    #[serde(default = "default_baseline")]
    pub baseline: String,

    /// Tag naming patterns, each containing a `{version}` placeholder
    #[serde(default = "default_tag_patterns")]
    pub tag_patterns: Vec<String>,

    /// Branches that release without a pre-release suffix
    #[serde(default = "default_release_branches")]
    pub release_branches: Vec<String>,

    /// Breaking changes bump minor while the major version is 0
    #[serde(default)]
    pub initial_development: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            baseline: default_baseline(),
            tag_patterns: default_tag_patterns(),
            release_branches: default_release_branches(),
            initial_development: false,
        }
    }
}

fn default_tag_path() -> String {
    DEFAULT_TAG_PATH.to_string()
}

/// Layout of the chart's values file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ValuesConfig {
    #[serde(default = "default_tag_path")]
    pub tag_path: String,
}

impl Default for ValuesConfig {
    fn default() -> Self {
        ValuesConfig {
            tag_path: default_tag_path(),
        }
    }
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

/// Returns the default list of keywords that mark a feature-level change.
fn default_minor_keywords() -> Vec<String> {
    vec!["feature".to_string(), "enhancement".to_string()]
}

fn default_feature_types() -> Vec<String> {
    vec!["feat".to_string(), "feature".to_string()]
}

/// Configuration for conventional commit analysis.
///
/// Defines the breaking change indicators, feature types and keywords used to
/// classify the commits made since the last release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,

    #[serde(default = "default_feature_types")]
    pub feature_types: Vec<String>,

    #[serde(default = "default_minor_keywords")]
    pub minor_keywords: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            breaking_change_indicators: default_breaking_change_indicators(),
            feature_types: default_feature_types(),
            minor_keywords: default_minor_keywords(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `helm-release.toml` in current directory
/// 3. `.helm-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new("./helm-release.toml").exists() {
        Path::new("./helm-release.toml").to_path_buf()
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(".helm-release.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        path
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        HelmReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let config = parse_config(&config_str)?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| HelmReleaseError::config(e.to_string()))
}
