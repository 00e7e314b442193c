use crate::error::{HelmReleaseError, Result};
use regex::Regex;
use semver::Version;

/// A git tag that marks a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: Version,
}

impl ReleaseTag {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        ReleaseTag {
            name: name.into(),
            version,
        }
    }
}

/// What a tag name turned out to be under the tag convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    /// A release version, e.g. `v1.2.0`
    Release(Version),
    /// A valid version carrying a pre-release part, e.g. `v1.2.0-rc.1`
    Prerelease(Version),
    /// Shaped like a version tag but not a valid semver
    Malformed { reason: String },
}

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
    matcher: Regex,
}

impl TagPattern {
    /// Create a new tag pattern
    ///
    /// The pattern must contain exactly one `{version}` placeholder.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches("{version}").count() != 1 {
            return Err(HelmReleaseError::config(format!(
                "Tag pattern '{}' must contain one {{version}} placeholder",
                pattern
            )));
        }

        // Escape everything, then let {version} capture anything starting with a digit
        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(\d.*)");
        let matcher = Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| HelmReleaseError::config(format!("Invalid tag pattern: {}", e)))?;

        Ok(TagPattern { pattern, matcher })
    }

    /// Classify a tag name, or `None` if it is not shaped like this pattern
    pub fn classify(&self, tag: &str) -> Option<TagMatch> {
        let body = self.matcher.captures(tag)?.get(1)?.as_str();
        Some(match Version::parse(body) {
            Ok(version) if version.pre.is_empty() => TagMatch::Release(version),
            Ok(version) => TagMatch::Prerelease(version),
            Err(e) => TagMatch::Malformed {
                reason: e.to_string(),
            },
        })
    }
}

/// The ordered set of patterns a project names its release tags with
#[derive(Debug, Clone)]
pub struct TagConvention {
    patterns: Vec<TagPattern>,
}

impl TagConvention {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            return Err(HelmReleaseError::config("At least one tag pattern is required"));
        }
        let patterns = patterns
            .iter()
            .map(|p| TagPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(TagConvention { patterns })
    }

    /// Classify a tag with the first pattern it is shaped like.
    ///
    /// A well-formed match wins over a malformed one from an earlier pattern,
    /// so `v1.2.0` is a release under `["{version}", "v{version}"]` too.
    pub fn classify(&self, tag: &str) -> Option<TagMatch> {
        let mut malformed = None;
        for pattern in &self.patterns {
            match pattern.classify(tag) {
                Some(TagMatch::Malformed { reason }) => {
                    malformed.get_or_insert(TagMatch::Malformed { reason });
                }
                Some(found) => return Some(found),
                None => {}
            }
        }
        malformed
    }
}

impl Default for TagConvention {
    fn default() -> Self {
        TagConvention {
            patterns: vec![
                TagPattern::new("v{version}").expect("valid default pattern"),
                TagPattern::new("{version}").expect("valid default pattern"),
            ],
        }
    }
}
