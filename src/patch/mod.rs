//! Structure-preserving edits of YAML documents
//!
//! Replaces exactly one scalar value addressed by a dotted path and leaves
//! every other byte of the document as it was: comments, key order, blank
//! lines, indentation and the quoting of untouched values. The result is read
//! back with `serde_yaml` before it replaces the file on disk.

pub mod atomic;
pub mod document;
pub mod path;
pub mod scalar;

pub use atomic::{remove_in_flight, write_atomically};
pub use document::{Document, LocateError};
pub use path::FieldPath;
pub use scalar::ScalarStyle;

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{HelmReleaseError, Result};

/// Outcome of a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchResult {
    /// The file was rewritten
    Updated,
    /// The field already held the value; nothing was written
    Unchanged,
}

/// Set `field` in the YAML file at `path` to the string `value`
pub fn patch_file(path: &Path, field: &FieldPath, value: &str) -> Result<PatchResult> {
    let text = read_document(path)?;
    let patched = patch_str(&text, field, value)
        .map_err(|e| HelmReleaseError::field_not_found(path, field.to_string(), e.to_string()))?;

    if patched == text {
        tracing::debug!(path = %path.display(), %field, "value already current");
        return Ok(PatchResult::Unchanged);
    }
    if !reads_back(&patched, field, value) {
        return Err(HelmReleaseError::field_not_found(
            path,
            field.to_string(),
            format!("'{}' does not read back after the edit", value),
        ));
    }

    write_atomically(path, patched.as_bytes())?;
    tracing::debug!(path = %path.display(), %field, %value, "patched field");
    Ok(PatchResult::Updated)
}

/// Return `text` with `field` set to `value`
pub fn patch_str(text: &str, field: &FieldPath, value: &str) -> std::result::Result<String, LocateError> {
    Document::parse(text).replace(field, value)
}

/// Read the string value at `field`, as YAML would
pub fn read_field(text: &str, field: &FieldPath) -> Option<String> {
    documents(text).into_iter().find_map(|doc| match lookup(&doc, field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

pub(crate) fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HelmReleaseError::not_found(path),
        _ => HelmReleaseError::Io(e),
    })
}

fn reads_back(text: &str, field: &FieldPath, value: &str) -> bool {
    documents(text)
        .iter()
        .any(|doc| matches!(lookup(doc, field), Some(Value::String(s)) if s == value))
}

/// Every document of a possibly multi-document YAML stream
pub(crate) fn parse_documents(text: &str) -> std::result::Result<Vec<Value>, serde_yaml::Error> {
    serde_yaml::Deserializer::from_str(text)
        .map(Value::deserialize)
        .collect()
}

fn documents(text: &str) -> Vec<Value> {
    parse_documents(text).unwrap_or_default()
}

fn lookup<'v>(value: &'v Value, field: &FieldPath) -> Option<&'v Value> {
    field.segments().iter().try_fold(value, |node, segment| {
        node.as_mapping()?
            .iter()
            .find(|(key, _)| key_matches(key, segment))
            .map(|(_, child)| child)
    })
}

fn key_matches(key: &Value, segment: &str) -> bool {
    match key {
        Value::String(s) => s == segment,
        Value::Number(n) => n.to_string() == segment,
        Value::Bool(b) => b.to_string() == segment,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALUES: &str = "\
# Image settings
image:
  repository: nginx
  # pinned by CI
  tag: \"1.16.0\"   # keep quoted
  pullPolicy: IfNotPresent

service:
  port: 80
";

    fn field(path: &str) -> FieldPath {
        FieldPath::parse(path).unwrap()
    }

    fn write_values(dir: &TempDir, text: &str) -> std::path::PathBuf {
        let path = dir.path().join("values.yaml");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_patch_file_changes_one_line() {
        let dir = TempDir::new().unwrap();
        let path = write_values(&dir, VALUES);

        let result = patch_file(&path, &field("image.tag"), "myimg:2.0.1").unwrap();
        assert_eq!(result, PatchResult::Updated);

        let after = fs::read_to_string(&path).unwrap();
        let changed: Vec<(&str, &str)> = VALUES
            .lines()
            .zip(after.lines())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(
            changed,
            vec![("  tag: \"1.16.0\"   # keep quoted", "  tag: \"myimg:2.0.1\"   # keep quoted")]
        );
        assert_eq!(VALUES.lines().count(), after.lines().count());
        assert_eq!(read_field(&after, &field("image.tag")).as_deref(), Some("myimg:2.0.1"));
    }

    #[test]
    fn test_patch_file_unchanged_skips_write() {
        let dir = TempDir::new().unwrap();
        let path = write_values(&dir, VALUES);

        let result = patch_file(&path, &field("image.tag"), "1.16.0").unwrap();
        assert_eq!(result, PatchResult::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), VALUES);
    }

    #[test]
    fn test_missing_field_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_values(&dir, VALUES);

        let err = patch_file(&path, &field("image.digest"), "sha256:abc").unwrap_err();
        assert!(matches!(err, HelmReleaseError::FieldNotFound { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), VALUES);
    }

    #[test]
    fn test_mapping_target_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_values(&dir, VALUES);

        let err = patch_file(&path, &field("image"), "x").unwrap_err();
        match err {
            HelmReleaseError::FieldNotFound { field, reason, .. } => {
                assert_eq!(field, "image");
                assert!(reason.contains("nested block"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = patch_file(&dir.path().join("values.yaml"), &field("image.tag"), "1").unwrap_err();
        assert!(matches!(err, HelmReleaseError::NotFound { .. }));
    }

    #[test]
    fn test_plain_value_needing_quotes() {
        let text = "image:\n  tag: latest\n";
        let patched = patch_str(text, &field("image.tag"), "2.0").unwrap();
        assert_eq!(patched, "image:\n  tag: \"2.0\"\n");
        assert_eq!(read_field(&patched, &field("image.tag")).as_deref(), Some("2.0"));
    }

    #[test]
    fn test_parse_documents_reads_every_document() {
        let docs = parse_documents("a: 1\n---\nb: 2\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert!(parse_documents("a: 1\n---\nb: [2\n").is_err());
    }

    #[test]
    fn test_read_field_numbers() {
        assert_eq!(read_field("service:\n  port: 80\n", &field("service.port")).as_deref(), Some("80"));
        assert_eq!(read_field("a: [1]\n", &field("a")), None);
        assert_eq!(read_field("a: [\n", &field("a")), None);
    }
}
