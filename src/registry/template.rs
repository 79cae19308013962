//! Template entry types and name matching.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IgnrError, Result};

/// File suffix every template file carries.
pub const TEMPLATE_SUFFIX: &str = ".gitignore";

/// Listing metadata for one template file in a remote collection.
///
/// Entries are unique by `path` within a single source's cache record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// File name including the suffix (e.g. `Go.gitignore`).
    pub name: String,
    /// Path inside the collection (e.g. `community/Golang/Hugo.gitignore`).
    pub path: String,
    /// Locator used to fetch the raw content.
    #[serde(rename = "download_url")]
    pub content_ref: String,
    /// Human-readable origin label, see [`SourceLabel`].
    #[serde(rename = "source")]
    pub source_label: String,
}

impl TemplateEntry {
    /// Template name with the suffix removed.
    pub fn display_name(&self) -> &str {
        self.name.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(&self.name)
    }
}

/// Where a listed template came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLabel {
    /// Root of the github/gitignore collection.
    GitHub,
    /// `community/` subtree of a collection.
    GitHubCommunity,
    /// `Global/` subtree of a collection.
    GitHubGlobal,
    /// The toptal/gitignore collection.
    TopTal,
    /// A user-registered collection, by nickname.
    User(String),
    /// Anything else.
    Unknown,
}

impl SourceLabel {
    /// The request prefix that addresses templates with this label.
    ///
    /// Returns `None` for [`SourceLabel::Unknown`].
    pub fn prefix(&self) -> Option<&str> {
        match self {
            Self::GitHub => Some("gh"),
            Self::GitHubCommunity => Some("ghc"),
            Self::GitHubGlobal => Some("ghg"),
            Self::TopTal => Some("tt"),
            Self::User(nickname) => Some(nickname),
            Self::Unknown => None,
        }
    }

    /// Parse a label previously produced by `to_string`.
    ///
    /// Registered nicknames are needed to tell user labels from unknown ones.
    pub fn parse<'a>(label: &str, mut nicknames: impl Iterator<Item = &'a String>) -> Self {
        match label {
            "GitHub" => Self::GitHub,
            "GitHub Community" => Self::GitHubCommunity,
            "GitHub Global" => Self::GitHubGlobal,
            "TopTal" => Self::TopTal,
            other => match nicknames.find(|n| n.as_str() == other) {
                Some(nickname) => Self::User(nickname.clone()),
                None => Self::Unknown,
            },
        }
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => f.write_str("GitHub"),
            Self::GitHubCommunity => f.write_str("GitHub Community"),
            Self::GitHubGlobal => f.write_str("GitHub Global"),
            Self::TopTal => f.write_str("TopTal"),
            Self::User(nickname) => f.write_str(nickname),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// A parsed template request token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRequest {
    /// `prefix:name`, served from a remote collection.
    Remote { prefix: String, name: String },
    /// Bare name, served from the local store.
    Local { name: String },
}

impl TemplateRequest {
    /// Parse a token such as `gh:Go`, `myrepo:Rust` or `my-template`.
    pub fn parse(token: &str) -> Self {
        match token.split_once(':') {
            Some((prefix, name)) => Self::Remote {
                prefix: prefix.trim().to_string(),
                name: name.trim().to_string(),
            },
            None => Self::Local {
                name: token.trim().to_string(),
            },
        }
    }
}

/// Find the entry for `name` in a listing.
///
/// Exact match on `<name>.gitignore` wins; otherwise the first
/// case-insensitive match is used.
pub fn find_template<'a>(
    name: &str,
    entries: &'a [TemplateEntry],
    source_key: &str,
) -> Result<&'a TemplateEntry> {
    let wanted = format!("{}{}", name, TEMPLATE_SUFFIX);

    entries
        .iter()
        .find(|e| e.name == wanted)
        .or_else(|| entries.iter().find(|e| e.name.eq_ignore_ascii_case(&wanted)))
        .ok_or_else(|| IgnrError::TemplateNotFound {
            name: name.to_string(),
            source_key: source_key.to_string(),
        })
}
