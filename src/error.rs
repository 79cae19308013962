//! Error types for ignr operations.
//!
//! This module defines [`IgnrError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Cache misses and corrupt cache files are never surfaced to callers; they
//!   fall through to the network path
//! - Failures while resolving a request token are wrapped in
//!   [`IgnrError::Template`] so batch callers can report them per token
//! - Use `anyhow::Error` (via `IgnrError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ignr operations.
#[derive(Debug, Error)]
pub enum IgnrError {
    /// A remote collection URL could not be turned into owner and collection.
    #[error("Invalid source URL '{url}': {reason}")]
    InvalidSourceUrl { url: String, reason: String },

    /// A request prefix is neither built-in nor a registered nickname.
    #[error("Unknown template source '{prefix}'")]
    UnknownSource { prefix: String },

    /// Network failure or non-success HTTP status.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// No template in the listing matched the requested name.
    #[error("Template '{name}' not found in {source_key}")]
    TemplateNotFound { name: String, source_key: String },

    /// A persisted cache file could not be parsed.
    #[error("Corrupt cache file {path}: {message}")]
    CacheCorrupt { path: PathBuf, message: String },

    /// Template missing from the local store.
    #[error("Local template '{name}' not found")]
    LocalTemplateNotFound { name: String },

    /// Template name rejected by the local store.
    #[error("Invalid template name '{name}': only letters, numbers, dashes and underscores are allowed")]
    InvalidTemplateName { name: String },

    /// Nickname rejected when registering a source.
    #[error("Invalid nickname '{nickname}': {reason}")]
    InvalidNickname { nickname: String, reason: String },

    /// Failed to parse the user configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A request token failed at some stage of resolution.
    #[error("{token}: {source}")]
    Template {
        token: String,
        #[source]
        source: Box<IgnrError>,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IgnrError {
    /// Attach the request token that produced this error.
    pub fn for_token(self, token: impl Into<String>) -> Self {
        Self::Template {
            token: token.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any token wrappers.
    pub fn root(&self) -> &IgnrError {
        match self {
            Self::Template { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for ignr operations.
pub type Result<T> = std::result::Result<T, IgnrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_source_url_displays_url_and_reason() {
        let err = IgnrError::InvalidSourceUrl {
            url: "https://github.com/acme".into(),
            reason: "missing collection name".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://github.com/acme"));
        assert!(msg.contains("missing collection name"));
    }

    #[test]
    fn unknown_source_displays_prefix() {
        let err = IgnrError::UnknownSource {
            prefix: "nope".into(),
        };
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn fetch_error_displays_status() {
        let err = IgnrError::Fetch {
            url: "https://example.com/Go.gitignore".into(),
            reason: "HTTP 404 Not Found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Go.gitignore"));
    }

    #[test]
    fn template_not_found_displays_name_and_source() {
        let err = IgnrError::TemplateNotFound {
            name: "Cobol".into(),
            source_key: "gh".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Cobol"));
        assert!(msg.contains("gh"));
    }

    #[test]
    fn token_wrapper_prefixes_message() {
        let err = IgnrError::UnknownSource {
            prefix: "zz".into(),
        }
        .for_token("zz:Go");
        assert!(err.to_string().starts_with("zz:Go: "));
        assert!(matches!(err.root(), IgnrError::UnknownSource { .. }));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: IgnrError = io_err.into();
        assert!(matches!(err, IgnrError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(IgnrError::LocalTemplateNotFound {
                name: "mine".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
