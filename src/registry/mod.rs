//! Template registry for ignr.
//!
//! This module resolves template request tokens to `.gitignore` content:
//! - Source collections and prefix resolution in [`source`]
//! - Recursive listing and content download in [`fetch`]
//! - Cache-first content retrieval in [`content`]
//! - Saved templates in [`local`]
//! - Token resolution and cache warm-up in [`resolver`]
//!
//! # Request tokens
//!
//! - `gh:Name`: github/gitignore, whole collection
//! - `ghc:Name`: github/gitignore, `community/`
//! - `ghg:Name`: github/gitignore, `Global/`
//! - `tt:Name`: toptal/gitignore, `templates/`
//! - `<nickname>:Name`: a registered collection
//! - `Name`: the local template store
//!
//! # Example
//!
//! ```
//! use ignr::registry::TemplateRequest;
//!
//! let request = TemplateRequest::parse("gh:Rust");
//! assert_eq!(
//!     request,
//!     TemplateRequest::Remote { prefix: "gh".into(), name: "Rust".into() }
//! );
//! ```

pub mod content;
pub mod fetch;
pub mod local;
pub mod resolver;
pub mod source;
pub mod template;

// Re-exports
pub use content::ContentResolver;
pub use fetch::{GithubClient, HttpFetcher};
pub use local::{is_valid_template_name, LocalStore};
pub use resolver::{Registry, Resolution, ResolvedTemplate, WARM_SOURCES};
pub use source::{
    detect_label, parse_repo_url, resolve, validate_nickname, BuiltinSource, RegisteredSources,
    RepoRef, SourceCollection, LOCAL_PREFIX,
};
pub use template::{find_template, SourceLabel, TemplateEntry, TemplateRequest, TEMPLATE_SUFFIX};
