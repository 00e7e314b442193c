use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::Builder;

use crate::error::{HelmReleaseError, Result};

static IN_FLIGHT: InFlightFiles = InFlightFiles::new();

/// Temporary files that exist only while a write is in progress
#[derive(Debug)]
struct InFlightFiles {
    paths: Mutex<Vec<PathBuf>>,
}

impl InFlightFiles {
    const fn new() -> Self {
        InFlightFiles {
            paths: Mutex::new(Vec::new()),
        }
    }

    fn paths(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Track `path` until the returned registration is dropped
    fn register(&self, path: &Path) -> Registration<'_> {
        self.paths().push(path.to_path_buf());
        Registration {
            files: self,
            path: path.to_path_buf(),
        }
    }

    #[cfg(test)]
    fn contains(&self, path: &Path) -> bool {
        self.paths().iter().any(|p| p == path)
    }

    /// Delete every tracked file and forget it
    fn remove_all(&self) {
        for path in self.paths().drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => tracing::trace!(path = %path.display(), "removed temporary file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "could not remove temporary file"),
            }
        }
    }
}

struct Registration<'a> {
    files: &'a InFlightFiles,
    path: PathBuf,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.files.paths().retain(|p| p != &self.path);
    }
}

/// Delete the temporary file of a write that is still in progress.
///
/// Meant for interrupt handlers; the target file is never touched.
pub fn remove_in_flight() {
    IN_FLIGHT.remove_all();
}

/// Replace the contents of `path` so readers see either the old or the new
/// file, never a partial one
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    replace_contents(path, |file| file.write_all(contents))
}

/// Write through `fill` into a sibling temporary file, then rename it over
/// `path`. On any failure the temporary file is removed and `path` is left
/// untouched.
pub(crate) fn replace_contents<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    // Follow symlinks so the link itself survives
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.",
        target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );

    let mut temp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| HelmReleaseError::write(path, e))?;
    let _registration = IN_FLIGHT.register(temp.path());

    fill(temp.as_file_mut()).map_err(|e| HelmReleaseError::write(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| HelmReleaseError::write(path, e))?;

    if let Ok(metadata) = fs::metadata(&target) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .map_err(|e| HelmReleaseError::write(path, e))?;
    }

    temp.persist(&target)
        .map_err(|e| HelmReleaseError::write(path, e.error))?;

    tracing::trace!(path = %target.display(), "replaced file");
    Ok(())
}
