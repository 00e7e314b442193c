use regex::Regex;
use std::sync::OnceLock;

/// Header of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    /// Lowercased commit type
    pub r#type: String,
    /// `!` after the type or scope
    pub has_breaking_marker: bool,
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)(?:\([^)]+\))?(!?):").expect("valid header pattern")
    })
}

impl ParsedCommit {
    /// Parse the header of a commit message following the Conventional Commits format
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// Returns `None` for non-conventional text. Only the first line is
    /// considered; footers are inspected separately.
    pub fn parse(message: &str) -> Option<Self> {
        let header = message.lines().next().unwrap_or_default().trim();
        let captures = header_pattern().captures(header)?;

        Some(ParsedCommit {
            r#type: captures.get(1)?.as_str().to_lowercase(),
            has_breaking_marker: captures.get(2).map(|m| m.as_str()) == Some("!"),
        })
    }
}
