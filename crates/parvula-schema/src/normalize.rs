use crate::types::PackageName;
use serde::Serialize;

/// Version recorded when a raw identifier carries no `:version` qualifier.
pub const LATEST_VERSION: &str = "last";

/// A normalized package identifier: canonical name plus the version qualifier.
///
/// The version is parsed and kept for callers but plays no part in resolution;
/// every version of a package maps to the same on-disk directory and load-state key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRef {
    pub name: PackageName,
    pub version: String,
}

impl PackageRef {
    pub fn is_latest(&self) -> bool {
        self.version == LATEST_VERSION
    }
}

/// Canonicalize a user-supplied identifier such as `"JQuery:2.1"` or `"my lib"`.
///
/// Splits on the first `:`, lowercases the name and replaces spaces with
/// underscores. Never fails; the empty string yields an empty name.
pub fn normalize(raw: &str) -> PackageRef {
    let (name, version) = match raw.split_once(':') {
        Some((name, version)) => (name, version),
        None => (raw, LATEST_VERSION),
    };

    PackageRef {
        name: PackageName::new(name.to_lowercase().replace(' ', "_")),
        version: version.to_owned(),
    }
}
