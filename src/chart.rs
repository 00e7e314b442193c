//! Chart directory handling
//!
//! [Chart::load] probes a directory for the descriptor and values files and
//! validates both. The handle then routes version and image tag updates
//! through the structure-preserving patcher.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;

use crate::config::DEFAULT_TAG_PATH;
use crate::error::{HelmReleaseError, Result};
use crate::patch::{self, FieldPath, PatchResult};

/// Descriptor file names, in lookup order
pub const DESCRIPTOR_FILES: [&str; 2] = ["Chart.yaml", "Chart.yml"];
/// Values file names, in lookup order
pub const VALUES_FILES: [&str; 2] = ["values.yaml", "values.yml"];

const VERSION_FIELD: &str = "version";

/// The fields of `Chart.yaml` that must be present
#[derive(Debug, Deserialize)]
struct ChartMetadata {
    name: String,
    version: String,
}

/// A validated chart directory
#[derive(Debug, Clone)]
pub struct Chart {
    root: PathBuf,
    descriptor_path: PathBuf,
    values_path: PathBuf,
    tag_path: FieldPath,
    name: String,
    version: String,
}

impl Chart {
    /// Load and validate the chart in `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(HelmReleaseError::not_found(root));
        }

        let descriptor_path = find_file(&root, &DESCRIPTOR_FILES)
            .ok_or_else(|| HelmReleaseError::not_found(root.join(DESCRIPTOR_FILES[0])))?;
        let text = patch::read_document(&descriptor_path)?;
        let metadata: ChartMetadata = serde_yaml::from_str(&text)
            .map_err(|e| HelmReleaseError::parse(&descriptor_path, e.to_string()))?;

        let values_path = match find_file(&root, &VALUES_FILES) {
            Some(path) => {
                let text = patch::read_document(&path)?;
                patch::parse_documents(&text)
                    .map_err(|e| HelmReleaseError::parse(&path, e.to_string()))?;
                path
            }
            None => {
                tracing::debug!(dir = %root.display(), "chart has no values file");
                root.join(VALUES_FILES[0])
            }
        };

        tracing::debug!(
            name = %metadata.name,
            version = %metadata.version,
            descriptor = %descriptor_path.display(),
            "loaded chart"
        );

        Ok(Chart {
            root,
            descriptor_path,
            values_path,
            tag_path: FieldPath::parse(DEFAULT_TAG_PATH)?,
            name: metadata.name,
            version: metadata.version,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor_path
    }

    pub fn values_path(&self) -> &Path {
        &self.values_path
    }

    /// Chart name from the descriptor
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version currently declared in the descriptor
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn tag_path(&self) -> &FieldPath {
        &self.tag_path
    }

    /// Change where [Chart::update_image_tag] writes
    pub fn set_tag_path(&mut self, path: FieldPath) {
        self.tag_path = path;
    }

    /// Write `version` into the descriptor's `version` field
    pub fn update_chart_version(&mut self, version: &Version) -> Result<PatchResult> {
        let value = version.to_string();
        let field = FieldPath::parse(VERSION_FIELD)?;
        let result = patch::patch_file(&self.descriptor_path, &field, &value)?;
        self.version = value;
        Ok(result)
    }

    /// Write `tag` into the values file at the configured tag path
    pub fn update_image_tag(&self, tag: &str) -> Result<PatchResult> {
        patch::patch_file(&self.values_path, &self.tag_path, tag)
    }
}

fn find_file(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
