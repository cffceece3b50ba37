use crate::layout::{validate_package_name, ComponentLayout};
use crate::{fsync_dir, StoreError};
use fs2::FileExt;
use parvula_schema::{read_manifest, PackageName};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use tracing::{debug, info};

/// A package directory found under the component base directory.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    /// Primary asset from the package's manifest, if it has a valid one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
}

/// Exclusive advisory lock on the install lock file, released on drop.
struct InstallLock {
    file: File,
}

impl InstallLock {
    fn acquire(path: &Path) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        file.lock_exclusive()
            .map_err(|e| StoreError::LockFailed(format!("{}: {e}", path.display())))?;
        Ok(Self { file })
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Read-mostly access to the component directory. Never touches manifests
/// or package contents after install.
pub struct ComponentStore {
    layout: ComponentLayout,
}

impl ComponentStore {
    pub fn new(layout: ComponentLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ComponentLayout {
        &self.layout
    }

    /// Whether `<base>/<name>` exists and can be read.
    pub fn exists(&self, name: &PackageName) -> bool {
        if validate_package_name(name).is_err() {
            return false;
        }
        let path = self.layout.package_dir(name);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::read_dir(&path).is_ok(),
            Ok(_) => File::open(&path).is_ok(),
            Err(_) => false,
        }
    }

    /// Install `source` as the only file of a new package directory.
    ///
    /// Returns `Ok(true)` when the package was installed and `Ok(false)` when
    /// a directory for `name` already existed, in which case nothing is written.
    /// The copy is staged next to its destination and renamed into place.
    pub fn register_local(&self, name: &PackageName, source: &Path) -> Result<bool, StoreError> {
        validate_package_name(name)?;

        let dest = self.layout.package_dir(name);
        if dest.exists() {
            debug!("package {name} already present, skipping install");
            return Ok(false);
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| StoreError::InvalidSource(source.display().to_string()))?;

        let base = self.layout.base_dir();
        fs::create_dir_all(base)?;
        let _lock = InstallLock::acquire(&self.layout.install_lock())?;

        // Another installer may have won while we waited for the lock.
        if dest.exists() {
            debug!("package {name} installed concurrently, skipping install");
            return Ok(false);
        }

        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(base)?;
        let staged_file = staging.path().join(file_name);
        fs::copy(source, &staged_file)?;
        File::open(&staged_file)?.sync_all()?;

        fs::rename(staging.path(), &dest)?;
        // The staging path is gone after the rename; only clean up on failure.
        let _ = staging.keep();
        fsync_dir(base)?;

        info!("installed package {name} from {}", source.display());
        Ok(true)
    }

    /// List installed packages, sorted by name. Hidden entries are skipped.
    pub fn list(&self) -> Result<Vec<InstalledPackage>, StoreError> {
        let base = self.layout.base_dir();
        if !base.exists() {
            return Ok(Vec::new());
        }

        let mut packages = Vec::new();
        for entry in fs::read_dir(base)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let main = read_manifest(&entry.path())
                .ok()
                .and_then(|m| m.main_asset().map(str::to_owned));
            packages.push(InstalledPackage { name, main });
        }
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::INSTALL_LOCK_FILE;
    use parvula_schema::normalize;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn test_store() -> (tempfile::TempDir, ComponentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ComponentStore::new(ComponentLayout::new(dir.path().join("components")));
        (dir, store)
    }

    fn source_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn register_local_creates_package_dir() {
        let (dir, store) = test_store();
        let src = source_file(dir.path(), "jq.js", "/* jquery */");
        let name = normalize("JQuery").name;

        assert!(store.register_local(&name, &src).unwrap());

        let installed = store.layout().package_dir(&name).join("jq.js");
        assert_eq!(fs::read_to_string(installed).unwrap(), "/* jquery */");
        assert!(store.exists(&name));
    }

    #[test]
    fn register_local_is_idempotent() {
        let (dir, store) = test_store();
        let first = source_file(dir.path(), "a.js", "first");
        let second = source_file(dir.path(), "b.js", "second");
        let name = normalize("lib").name;

        assert!(store.register_local(&name, &first).unwrap());
        assert!(!store.register_local(&name, &second).unwrap());

        let pkg = store.layout().package_dir(&name);
        assert!(pkg.join("a.js").exists());
        assert!(!pkg.join("b.js").exists());
    }

    #[test]
    fn register_local_missing_source_is_io_error() {
        let (dir, store) = test_store();
        let name = normalize("ghost").name;
        let err = store
            .register_local(&name, &dir.path().join("missing.js"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(!store.exists(&name));
    }

    #[test]
    fn register_local_rejects_traversal_name() {
        let (dir, store) = test_store();
        let src = source_file(dir.path(), "x.js", "x");
        let err = store.register_local(&normalize("..").name, &src).unwrap_err();
        assert!(matches!(err, StoreError::InvalidName { .. }));
    }

    #[test]
    fn failed_install_leaves_no_staging_dirs() {
        let (dir, store) = test_store();
        let name = normalize("ghost").name;
        let _ = store.register_local(&name, &dir.path().join("missing.js"));
        assert!(store.list().unwrap().is_empty());
        let leftovers: Vec<_> = fs::read_dir(store.layout().base_dir())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().starts_with(".staging-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn concurrent_register_local_installs_once() {
        let (dir, store) = test_store();
        let src = source_file(dir.path(), "x.js", "x");
        let store = Arc::new(store);
        let barrier = Arc::new(Barrier::new(8));
        let name = normalize("shared").name;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let src = src.clone();
                let name = name.clone();
                thread::spawn(move || {
                    barrier.wait();
                    store.register_local(&name, &src).unwrap()
                })
            })
            .collect();

        let installed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&b| b)
            .count();
        assert_eq!(installed, 1);
    }

    #[test]
    fn successful_install_leaves_only_package_and_lock() {
        let (dir, store) = test_store();
        let src = source_file(dir.path(), "x.js", "x");
        store.register_local(&normalize("lib").name, &src).unwrap();

        let mut entries: Vec<_> = fs::read_dir(store.layout().base_dir())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        assert_eq!(entries, vec![INSTALL_LOCK_FILE.to_owned(), "lib".to_owned()]);
        assert!(store.layout().package_dir(&normalize("lib").name).join("x.js").is_file());
    }

    #[test]
    fn store_files_are_not_packages() {
        let (dir, store) = test_store();
        let src = source_file(dir.path(), "x.js", "x");
        store.register_local(&normalize("jquery").name, &src).unwrap();
        assert!(store.layout().install_lock().exists());

        assert!(!store.exists(&normalize(INSTALL_LOCK_FILE).name));
        let names: Vec<_> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["jquery"]);
    }

    #[test]
    fn exists_is_false_for_missing_and_invalid() {
        let (_dir, store) = test_store();
        assert!(!store.exists(&normalize("nothing").name));
        assert!(!store.exists(&normalize("").name));
    }

    #[test]
    fn list_reports_manifest_main() {
        let (_dir, store) = test_store();
        let base = store.layout().base_dir().to_path_buf();
        fs::create_dir_all(base.join("jquery")).unwrap();
        fs::write(
            base.join("jquery").join("bower.json"),
            r#"{"main": "dist/jquery.js"}"#,
        )
        .unwrap();
        fs::create_dir_all(base.join("bare")).unwrap();
        fs::create_dir_all(base.join(".staging-abc")).unwrap();

        let list = store.list().unwrap();
        assert_eq!(
            list,
            vec![
                InstalledPackage {
                    name: "bare".to_owned(),
                    main: None,
                },
                InstalledPackage {
                    name: "jquery".to_owned(),
                    main: Some("dist/jquery.js".to_owned()),
                },
            ]
        );
    }

    #[test]
    fn list_missing_base_is_empty() {
        let (_dir, store) = test_store();
        assert!(store.list().unwrap().is_empty());
    }
}
