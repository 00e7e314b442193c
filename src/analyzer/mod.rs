//! Analysis engine for classifying the commits since the last release

pub mod version_analyzer;

pub use version_analyzer::VersionAnalyzer;
