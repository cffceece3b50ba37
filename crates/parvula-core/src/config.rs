use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolver configuration, usually read from `parvula.toml`.
///
/// `base_path` is both the URI segment and the on-disk directory (under
/// `root_dir`) holding the packages. `root_prefix` is the relative-to-root
/// prefix the hosting application places in front of every local URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default)]
    pub root_prefix: String,
    /// CDN URLs registered when the resolver is constructed.
    #[serde(default)]
    pub cdn: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            base_path: default_base_path(),
            root_prefix: String::new(),
            cdn: BTreeMap::new(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_base_path() -> String {
    "components/".to_owned()
}

impl ResolverConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        base_path.clone_into(&mut self.base_path);
        self
    }

    #[must_use]
    pub fn with_root_prefix(mut self, root_prefix: &str) -> Self {
        root_prefix.clone_into(&mut self.root_prefix);
        self
    }

    #[must_use]
    pub fn with_cdn(mut self, name: &str, url: &str) -> Self {
        self.cdn.insert(name.to_owned(), url.to_owned());
        self
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("cannot read config {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| CoreError::Config(format!("invalid config {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("cannot serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate and canonicalize the path segments: `base_path` always ends in
    /// `/`, `root_prefix` is empty or ends in `/`, and neither has a leading `/`.
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        let base = self.base_path.trim();
        if base.is_empty() || base.trim_matches('/').is_empty() {
            return Err(CoreError::Config("base_path must not be empty".to_owned()));
        }
        if base.starts_with('/') || Path::new(base).is_absolute() {
            return Err(CoreError::Config(format!(
                "base_path must be relative to root_dir, got '{base}'"
            )));
        }
        self.base_path = with_trailing_slash(base);

        let prefix = self.root_prefix.trim().trim_start_matches('/');
        self.root_prefix = if prefix.is_empty() {
            String::new()
        } else {
            with_trailing_slash(prefix)
        };
        Ok(self)
    }

    /// Directory on disk that holds one sub-directory per package.
    pub fn components_dir(&self) -> PathBuf {
        self.root_dir.join(self.base_path.trim_end_matches('/'))
    }
}

fn with_trailing_slash(segment: &str) -> String {
    format!("{}/", segment.trim_end_matches('/'))
}
