//! ignr - Assemble `.gitignore` files from template collections.
//!
//! Templates come from the GitHub and TopTal gitignore repositories, from
//! any user-registered GitHub repository, or from a local template store.
//! Remote listings and template content are cached on disk for two weeks.
//!
//! # Modules
//!
//! - [`cache`] - On-disk listing and content caches with lazy expiry
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - User configuration and runtime settings
//! - [`error`] - Error types and result aliases
//! - [`registry`] - Template sources, listing and content resolution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use ignr::registry::{TemplateRequest, BuiltinSource};
//!
//! let request = TemplateRequest::parse("tt:Rust");
//! assert_eq!(request, TemplateRequest::Remote {
//!     prefix: BuiltinSource::TopTal.prefix().to_string(),
//!     name: "Rust".to_string(),
//! });
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod ui;

pub use error::{IgnrError, Result};
