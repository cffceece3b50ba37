use crate::StoreError;
use parvula_schema::{PackageName, MANIFEST_FILE};
use std::path::{Path, PathBuf};

/// Advisory lock file that serializes local installs.
pub const INSTALL_LOCK_FILE: &str = ".install.lock";

const MAX_NAME_LEN: usize = 128;

/// Directory layout for installed components.
///
/// The base directory is fixed at construction and never changes for the
/// lifetime of the layout. Each package lives in `<base>/<name>/`.
#[derive(Debug, Clone)]
pub struct ComponentLayout {
    base: PathBuf,
}

impl ComponentLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    #[inline]
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    #[inline]
    pub fn package_dir(&self, name: &PackageName) -> PathBuf {
        self.base.join(name.as_str())
    }

    #[inline]
    pub fn manifest_path(&self, name: &PackageName) -> PathBuf {
        self.package_dir(name).join(MANIFEST_FILE)
    }

    #[inline]
    pub fn install_lock(&self) -> PathBuf {
        self.base.join(INSTALL_LOCK_FILE)
    }
}

/// Check that a normalized name is safe to use as a single path component.
pub fn validate_package_name(name: &PackageName) -> Result<(), StoreError> {
    let invalid = |reason: &str| StoreError::InvalidName {
        name: name.to_string(),
        reason: reason.to_owned(),
    };

    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(invalid("package name must be 1-128 bytes"));
    }
    // Dot entries in the base directory belong to the store (lock, staging).
    if name.starts_with('.') {
        return Err(invalid("package name must not start with '.'"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(invalid("package name must not contain path separators"));
    }
    Ok(())
}
