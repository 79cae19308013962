//! User configuration for ignr.
//!
//! - Schema of `config.yaml` in [`schema`]
//! - Loading and atomic saving in [`store`]
//! - Config directory resolution and derived paths in [`settings`]
//!
//! # Example
//!
//! ```
//! use ignr::config::Settings;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let settings = Settings::new(temp.path());
//! let store = settings.config_store();
//!
//! store.register_source("work", "https://github.com/acme/templates").unwrap();
//! assert!(store.take_refresh_flag().unwrap());
//! assert!(store.registered_sources().unwrap().contains_key("work"));
//! ```

pub mod schema;
pub mod settings;
pub mod store;

pub use schema::{TemplateSettings, UserConfig};
pub use settings::{Settings, CONFIG_DIR_ENV};
pub use store::{ConfigStore, CONFIG_FILE};
