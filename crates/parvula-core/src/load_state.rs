use parvula_schema::PackageName;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Which resolution strategy emitted a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Local,
    Cdn,
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Cdn => write!(f, "cdn"),
        }
    }
}

/// Record of packages that already had a URI handed out.
///
/// Shared by the local and CDN strategies: a package emitted by one is never
/// emitted again by either. Entries are never removed.
#[derive(Debug, Default)]
pub struct LoadState {
    loaded: Mutex<HashMap<PackageName, LoadSource>>,
}

impl LoadState {
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section is a single map operation, so a poisoned map is
    // still consistent.
    pub(crate) fn lock(&self) -> MutexGuard<'_, HashMap<PackageName, LoadSource>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `name` as loaded. Returns `true` only for the first caller.
    pub fn try_mark(&self, name: &PackageName, source: LoadSource) -> bool {
        let mut loaded = self.lock();
        if loaded.contains_key(name) {
            return false;
        }
        loaded.insert(name.clone(), source);
        true
    }

    pub fn is_loaded(&self, name: &PackageName) -> bool {
        self.lock().contains_key(name)
    }

    pub fn source_of(&self, name: &PackageName) -> Option<LoadSource> {
        self.lock().get(name).copied()
    }

    /// Loaded packages sorted by name.
    pub fn snapshot(&self) -> Vec<(PackageName, LoadSource)> {
        let mut entries: Vec<_> = self
            .lock()
            .iter()
            .map(|(name, source)| (name.clone(), *source))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parvula_schema::normalize;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn first_mark_wins() {
        let state = LoadState::new();
        let name = normalize("jquery").name;
        assert!(state.try_mark(&name, LoadSource::Local));
        assert!(!state.try_mark(&name, LoadSource::Local));
        assert!(!state.try_mark(&name, LoadSource::Cdn));
        assert_eq!(state.source_of(&name), Some(LoadSource::Local));
    }

    #[test]
    fn names_are_independent() {
        let state = LoadState::new();
        assert!(state.try_mark(&normalize("a").name, LoadSource::Local));
        assert!(state.try_mark(&normalize("b").name, LoadSource::Cdn));
        assert!(!state.is_loaded(&normalize("c").name));
    }

    #[test]
    fn snapshot_is_sorted() {
        let state = LoadState::new();
        state.try_mark(&normalize("zepto").name, LoadSource::Cdn);
        state.try_mark(&normalize("angular").name, LoadSource::Local);
        let names: Vec<_> = state
            .snapshot()
            .into_iter()
            .map(|(n, _)| n.into_inner())
            .collect();
        assert_eq!(names, vec!["angular", "zepto"]);
    }

    #[test]
    fn concurrent_marks_have_single_winner() {
        let state = Arc::new(LoadState::new());
        let barrier = Arc::new(Barrier::new(16));
        let name = normalize("race").name;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let state = Arc::clone(&state);
                let barrier = Arc::clone(&barrier);
                let name = name.clone();
                thread::spawn(move || {
                    barrier.wait();
                    state.try_mark(&name, LoadSource::Local)
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn load_source_display() {
        assert_eq!(LoadSource::Local.to_string(), "local");
        assert_eq!(LoadSource::Cdn.to_string(), "cdn");
    }
}
