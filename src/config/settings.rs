//! Runtime settings and derived on-disk locations.

use std::path::{Path, PathBuf};

use super::schema::UserConfig;
use super::store::ConfigStore;
use crate::error::{IgnrError, Result};
use crate::registry::fetch::DEFAULT_API_URL;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "IGNR_CONFIG_DIR";

/// Where ignr keeps its state and which remote API it talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `config.yaml`, the caches and the default template store.
    pub config_dir: PathBuf,
    /// Base URL of the GitHub API.
    pub api_url: String,
    /// Optional bearer token for the GitHub API.
    pub github_token: Option<String>,
}

impl Settings {
    /// Settings rooted at `config_dir`, talking to the public API.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            api_url: DEFAULT_API_URL.to_string(),
            github_token: None,
        }
    }

    /// Use the given config directory, or the platform default when `None`.
    pub fn resolve(config_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match config_dir {
            Some(dir) => dir,
            None => Self::default_config_dir().ok_or_else(|| {
                IgnrError::Other(anyhow::anyhow!(
                    "Could not determine a configuration directory; pass --config-dir or set {}",
                    CONFIG_DIR_ENV
                ))
            })?,
        };
        Ok(Self::new(dir))
    }

    /// `<platform config dir>/ignr`.
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ignr"))
    }

    /// Override the API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the API token.
    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token;
        self
    }

    /// The configuration store.
    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(&self.config_dir)
    }

    /// Root of all cache files.
    pub fn cache_dir(&self) -> PathBuf {
        self.config_dir.join("cache")
    }

    /// Directory of per-source listing records.
    pub fn listing_cache_dir(&self) -> PathBuf {
        self.cache_dir().join("sources")
    }

    /// Local template store directory for a configuration.
    pub fn template_dir(&self, config: &UserConfig) -> PathBuf {
        match &config.templates.storage_path {
            Some(path) => self.relative_to_config(path),
            None => self.config_dir.join("templates"),
        }
    }

    fn relative_to_config(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths() {
        let settings = Settings::new("/cfg");

        assert_eq!(settings.cache_dir(), PathBuf::from("/cfg/cache"));
        assert_eq!(settings.listing_cache_dir(), PathBuf::from("/cfg/cache/sources"));
        assert_eq!(
            settings.config_store().path(),
            Path::new("/cfg/config.yaml")
        );
        assert_eq!(settings.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn template_dir_defaults_under_config_dir() {
        let settings = Settings::new("/cfg");
        assert_eq!(
            settings.template_dir(&UserConfig::default()),
            PathBuf::from("/cfg/templates")
        );
    }

    #[test]
    fn template_dir_honours_storage_path() {
        let settings = Settings::new("/cfg");
        let mut config = UserConfig::default();

        config.templates.storage_path = Some(PathBuf::from("/elsewhere"));
        assert_eq!(settings.template_dir(&config), PathBuf::from("/elsewhere"));

        config.templates.storage_path = Some(PathBuf::from("mine"));
        assert_eq!(settings.template_dir(&config), PathBuf::from("/cfg/mine"));
    }

    #[test]
    fn resolve_prefers_explicit_dir() {
        let settings = Settings::resolve(Some(PathBuf::from("/explicit"))).unwrap();
        assert_eq!(settings.config_dir, PathBuf::from("/explicit"));
    }

    #[test]
    fn builders() {
        let settings = Settings::new("/cfg")
            .with_api_url("http://localhost:1234")
            .with_github_token(Some("t".into()));
        assert_eq!(settings.api_url, "http://localhost:1234");
        assert_eq!(settings.github_token.as_deref(), Some("t"));
    }
}
