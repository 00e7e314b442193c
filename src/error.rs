use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for helm-release operations
#[derive(Error, Debug)]
pub enum HelmReleaseError {
    #[error("Not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Not a git repository: {}: {reason}", .path.display())]
    NotAVersionedTree { path: PathBuf, reason: String },

    #[error("Unable to resolve version: {0}")]
    UnresolvableVersion(String),

    #[error("Field '{field}' not found in {}: {reason}", .path.display())]
    FieldNotFound {
        path: PathBuf,
        field: String,
        reason: String,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in helm-release
pub type Result<T> = std::result::Result<T, HelmReleaseError>;

impl HelmReleaseError {
    /// Create a not-found error for a path
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        HelmReleaseError::NotFound { path: path.into() }
    }

    /// Create a parse error with context
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        HelmReleaseError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unresolvable version error with context
    pub fn unresolvable(msg: impl Into<String>) -> Self {
        HelmReleaseError::UnresolvableVersion(msg.into())
    }

    /// Create a field-not-found error for a document and dotted path
    pub fn field_not_found(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HelmReleaseError::FieldNotFound {
            path: path.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a write error for a path
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HelmReleaseError::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        HelmReleaseError::Config(msg.into())
    }
}
