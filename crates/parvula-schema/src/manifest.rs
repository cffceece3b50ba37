use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the per-package manifest inside a component directory.
pub const MANIFEST_FILE: &str = "bower.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("malformed manifest {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// The `main` entry of a bower manifest: a single asset or a list of assets.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MainField {
    Single(String),
    Multiple(Vec<String>),
}

/// The subset of `bower.json` the resolver reads. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BowerManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub main: MainField,
}

impl BowerManifest {
    /// The package's primary asset path, relative to the package directory.
    ///
    /// For a list-valued `main` this is the first entry.
    pub fn main_asset(&self) -> Option<&str> {
        let asset = match &self.main {
            MainField::Single(path) => path.as_str(),
            MainField::Multiple(paths) => paths.first()?.as_str(),
        };
        if asset.trim().is_empty() {
            None
        } else {
            Some(asset)
        }
    }
}

/// Parse manifest JSON. `origin` is only used in error messages.
pub fn parse_manifest_str(input: &str, origin: &Path) -> Result<BowerManifest, ManifestError> {
    let manifest: BowerManifest =
        serde_json::from_str(input).map_err(|e| ManifestError::Malformed {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;

    if manifest.main_asset().is_none() {
        return Err(ManifestError::Malformed {
            path: origin.to_path_buf(),
            reason: "`main` is empty".to_owned(),
        });
    }
    Ok(manifest)
}

/// Read `<package_dir>/bower.json`.
///
/// A missing or unreadable file, or a path that is not a regular file, is
/// `NotFound`. Nothing is cached here.
pub fn read_manifest(package_dir: &Path) -> Result<BowerManifest, ManifestError> {
    let path = package_dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(ManifestError::NotFound { path });
    }
    let Ok(content) = fs::read_to_string(&path) else {
        return Err(ManifestError::NotFound { path });
    };
    parse_manifest_str(&content, &path)
}
