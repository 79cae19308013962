//! Reading and writing the user configuration file.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use super::schema::UserConfig;
use crate::error::{IgnrError, Result};
use crate::registry::source::RegisteredSources;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Handle on `<config-dir>/config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the configuration file in `config_dir`.
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(CONFIG_FILE),
        }
    }

    /// Get the configuration file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseError` if the YAML is invalid.
    pub fn load(&self) -> Result<UserConfig> {
        if !self.path.exists() {
            return Ok(UserConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(UserConfig::default());
        }

        serde_yaml::from_str(&content).map_err(|e| IgnrError::ConfigParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Save the configuration using write-to-temp-then-rename.
    pub fn save(&self, config: &UserConfig) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = serde_yaml::to_string(config).context("Failed to serialize config")?;

        let temp_path = self.path.with_extension("yaml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Registered collections, nickname → URL.
    pub fn registered_sources(&self) -> Result<RegisteredSources> {
        Ok(self.load()?.repositories)
    }

    /// Read the refresh flag and clear it.
    ///
    /// The file is only rewritten when the flag was set.
    pub fn take_refresh_flag(&self) -> Result<bool> {
        let mut config = self.load()?;
        if !config.cache_needs_refresh {
            return Ok(false);
        }

        config.cache_needs_refresh = false;
        self.save(&config)?;
        Ok(true)
    }

    /// Register (or replace) a collection under `nickname` and mark
    /// registered listings for refresh.
    pub fn register_source(&self, nickname: &str, url: &str) -> Result<()> {
        let mut config = self.load()?;
        config
            .repositories
            .insert(nickname.to_string(), url.to_string());
        config.cache_needs_refresh = true;
        self.save(&config)
    }
}
