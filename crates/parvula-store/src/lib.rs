//! Filesystem side of the Parvula component resolver.
//!
//! `ComponentLayout` fixes the base directory that holds one sub-directory per
//! package, and `ComponentStore` answers existence checks, lists installed
//! packages, and installs local files as new packages (`register_local`).

pub mod install;
pub mod layout;

pub use install::{ComponentStore, InstalledPackage};
pub use layout::{validate_package_name, ComponentLayout, INSTALL_LOCK_FILE};

use std::path::Path;
use thiserror::Error;

/// Fsync a directory so that a preceding `rename()` into it is durable.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid package name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
    #[error("source file has no file name: {0}")]
    InvalidSource(String),
    #[error("lock acquisition failed: {0}")]
    LockFailed(String),
}
