use crate::config::ConventionalCommitsConfig;
use crate::domain::{ChangeKind, ParsedCommit};

/// Classifies commits to determine the severity of unreleased changes
pub struct VersionAnalyzer {
    config: ConventionalCommitsConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Classify a single commit message
    ///
    /// - `type!:` or a breaking change footer → breaking
    /// - a feature type → feature
    /// - a non-conventional header containing a minor keyword as a word → feature
    /// - anything else → patch
    pub fn classify(&self, message: &str) -> ChangeKind {
        let parsed = ParsedCommit::parse(message);

        let has_breaking_footer = message.lines().any(|line| {
            self.config
                .breaking_change_indicators
                .iter()
                .any(|indicator| line.trim_start().starts_with(indicator.as_str()))
        });
        let has_breaking_marker = parsed.as_ref().is_some_and(|p| p.has_breaking_marker);
        if has_breaking_marker || has_breaking_footer {
            return ChangeKind::Breaking;
        }

        let is_feature = match &parsed {
            Some(parsed) => self
                .config
                .feature_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&parsed.r#type)),
            None => self.has_minor_keyword(message.lines().next().unwrap_or_default()),
        };
        if is_feature {
            return ChangeKind::Feature;
        }

        ChangeKind::Patch
    }

    /// Whether a minor keyword appears as a whole word in `header`
    fn has_minor_keyword(&self, header: &str) -> bool {
        header
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| {
                self.config
                    .minor_keywords
                    .iter()
                    .any(|keyword| keyword.eq_ignore_ascii_case(word))
            })
    }

    /// Highest severity across a range of commit messages
    pub fn analyze_messages<S: AsRef<str>>(&self, messages: &[S]) -> ChangeKind {
        messages
            .iter()
            .map(|m| self.classify(m.as_ref()))
            .max()
            .unwrap_or(ChangeKind::None)
    }
}

impl Default for VersionAnalyzer {
    fn default() -> Self {
        VersionAnalyzer::new(ConventionalCommitsConfig::default())
    }
}
