use crate::cdn::CdnRegistry;
use crate::config::ResolverConfig;
use crate::load_state::{LoadSource, LoadState};
use crate::CoreError;
use parvula_schema::{normalize, read_manifest, PackageName};
use parvula_store::{validate_package_name, ComponentLayout, ComponentStore, InstalledPackage};
use std::path::Path;
use tracing::{debug, info};

/// Resolves package names to embeddable asset URIs, emitting each at most once.
///
/// One resolver is built per process (or per server instance) and shared by
/// reference or `Arc` between request handlers; all methods take `&self`.
pub struct ComponentResolver {
    config: ResolverConfig,
    store: ComponentStore,
    load_state: LoadState,
    cdn: CdnRegistry,
}

impl ComponentResolver {
    /// Build a resolver. CDN entries from the config are registered up front.
    pub fn new(config: ResolverConfig) -> Result<Self, CoreError> {
        let config = config.normalized()?;
        let store = ComponentStore::new(ComponentLayout::new(config.components_dir()));

        let cdn = CdnRegistry::new();
        for (name, url) in &config.cdn {
            cdn.register(normalize(name).name, url.clone());
        }
        debug!(
            "component resolver rooted at {} ({} CDN entries)",
            store.layout().base_dir().display(),
            cdn.len()
        );

        Ok(Self {
            config,
            store,
            load_state: LoadState::new(),
            cdn,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `package` from the local component directory.
    ///
    /// Uses `explicit_path` when given, otherwise the `main` asset of the
    /// package's bower manifest. Returns `None` when nothing can be resolved
    /// or when the package was already emitted by this resolver.
    pub fn load(&self, package: &str, explicit_path: Option<&str>) -> Option<String> {
        let name = normalize(package).name;
        if let Err(e) = validate_package_name(&name) {
            debug!("not loading '{package}': {e}");
            return None;
        }

        let relative = match explicit_path {
            Some(path) => rooted(path),
            None => match read_manifest(&self.store.layout().package_dir(&name)) {
                Ok(manifest) => rooted(manifest.main_asset()?),
                Err(e) => {
                    debug!("not loading {name}: {e}");
                    return None;
                }
            },
        };

        if !self.load_state.try_mark(&name, LoadSource::Local) {
            debug!("{name} already loaded");
            return None;
        }

        Some(format!(
            "./{}{}{name}{relative}",
            self.config.root_prefix, self.config.base_path
        ))
    }

    /// Resolve several packages through their manifests, in order.
    ///
    /// Only URIs actually emitted are returned.
    pub fn load_many<'a, I>(&self, packages: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        packages
            .into_iter()
            .filter_map(|package| self.load(package, None))
            .collect()
    }

    /// Resolve `package` through the CDN registry.
    ///
    /// `Ok(None)` when the package was already emitted (by either strategy).
    /// `Err(NotRegistered)` when it was not emitted yet but has no CDN entry;
    /// the package is then left unmarked.
    pub fn load_from_cdn(&self, package: &str) -> Result<Option<String>, CoreError> {
        let name = normalize(package).name;

        let mut loaded = self.load_state.lock();
        if loaded.contains_key(&name) {
            debug!("{name} already loaded");
            return Ok(None);
        }
        let Some(url) = self.cdn.lookup(&name) else {
            return Err(CoreError::NotRegistered(name.into_inner()));
        };
        loaded.insert(name, LoadSource::Cdn);
        Ok(Some(url))
    }

    /// Register (or replace) the CDN URL for `package`.
    pub fn register_cdn(&self, package: &str, url: &str) {
        let name = normalize(package).name;
        info!("registered CDN url for {name}: {url}");
        self.cdn.register(name, url);
    }

    /// Whether a readable directory for `package` exists under the base path.
    pub fn exists(&self, package: &str) -> bool {
        self.store.exists(&normalize(package).name)
    }

    /// Install `source` as package `package` unless it is already present.
    ///
    /// Returns `true` if a new package directory was created.
    pub fn register_local(&self, package: &str, source: &Path) -> Result<bool, CoreError> {
        let name = normalize(package).name;
        Ok(self.store.register_local(&name, source)?)
    }

    pub fn is_loaded(&self, package: &str) -> bool {
        self.load_state.is_loaded(&normalize(package).name)
    }

    /// Packages emitted so far and the strategy that emitted them.
    pub fn loaded(&self) -> Vec<(PackageName, LoadSource)> {
        self.load_state.snapshot()
    }

    pub fn cdn_entries(&self) -> Vec<(PackageName, String)> {
        self.cdn.entries()
    }

    pub fn installed(&self) -> Result<Vec<InstalledPackage>, CoreError> {
        Ok(self.store.list()?)
    }
}

/// Turn an asset path into `/<path>`: strips a leading `./` and leading slashes.
fn rooted(path: &str) -> String {
    let path = path.strip_prefix("./").unwrap_or(path);
    format!("/{}", path.trim_start_matches('/'))
}
