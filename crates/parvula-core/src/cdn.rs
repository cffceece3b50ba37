use parvula_schema::PackageName;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Mapping from package name to an externally hosted asset URL.
///
/// Populated only by explicit registration; independent of what is on disk.
#[derive(Debug, Default)]
pub struct CdnRegistry {
    entries: RwLock<BTreeMap<PackageName, String>>,
}

impl CdnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the URL for `name`. Last write wins.
    pub fn register(&self, name: PackageName, url: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, url.into());
    }

    pub fn lookup(&self, name: &PackageName) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &PackageName) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// All entries, sorted by name.
    pub fn entries(&self) -> Vec<(PackageName, String)> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
