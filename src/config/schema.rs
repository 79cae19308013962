//! User configuration schema.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::registry::source::RegisteredSources;

/// Persisted user configuration.
///
/// ```yaml
/// repositories:
///   work: https://github.com/acme/gitignore-templates
/// cache_needs_refresh: false
/// templates:
///   storage_path: /home/me/gitignore-templates
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Registered collections, nickname → remote URL.
    pub repositories: RegisteredSources,

    /// Set when a registered collection changed and its listing cache
    /// should be refetched regardless of age.
    pub cache_needs_refresh: bool,

    /// Local template store settings.
    pub templates: TemplateSettings,
}

/// Local template store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory holding saved templates. Defaults to `<config-dir>/templates`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}
