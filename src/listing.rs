//! Directory enumeration for the notebook and image folders.

use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};

pub const NOTEBOOK_EXTENSIONS: &[&str] = &[".ipynb"];
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// List the regular files directly under `dir` whose name ends with one of
/// `extensions`.
///
/// Matching is a case-sensitive suffix test. The result is sorted
/// lexicographically so the same directory always lists the same way.
pub fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<String>> {
    let filesystem_error = |source| DashboardError::Filesystem {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(filesystem_error)? {
        let entry = entry.map_err(filesystem_error)?;

        // Follows symlinks, so a link to a notebook still counts.
        let is_file = entry.path().is_file();
        if !is_file {
            continue;
        }

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::debug!("Skipping non UTF-8 file name {:?}", raw);
                continue;
            }
        };

        if extensions.iter().any(|ext| name.ends_with(ext)) {
            names.push(name);
        }
    }

    names.sort();
    tracing::debug!("Listed {} file(s) in {}", names.len(), dir.display());
    Ok(names)
}

pub fn list_notebooks(dir: &Path) -> Result<Vec<String>> {
    list_files(dir, NOTEBOOK_EXTENSIONS)
}

pub fn list_images(dir: &Path) -> Result<Vec<String>> {
    list_files(dir, IMAGE_EXTENSIONS)
}

/// Resolve `name` against the listing of `dir`, refusing anything the
/// listing does not contain (including path components like `..`).
pub(crate) fn resolve_listed(dir: &Path, name: &str, listing: &[String]) -> Result<PathBuf> {
    if listing.iter().any(|listed| listed == name) {
        Ok(dir.join(name))
    } else {
        Err(DashboardError::NotFound(name.to_string()))
    }
}
