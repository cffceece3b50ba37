//! Package identifiers and manifests for Parvula front-end components.
//!
//! This crate defines the schema layer: canonical package names (`PackageName`)
//! produced by [`normalize`], the version qualifier split off a raw identifier
//! (`PackageRef`), and the read-only bower manifest (`BowerManifest`) that names
//! a package's primary asset.

pub mod manifest;
pub mod normalize;
pub mod types;

pub use manifest::{
    parse_manifest_str, read_manifest, BowerManifest, MainField, ManifestError, MANIFEST_FILE,
};
pub use normalize::{normalize, PackageRef, LATEST_VERSION};
pub use types::PackageName;
