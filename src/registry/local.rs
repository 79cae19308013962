//! Local template store.
//!
//! Templates saved by the user live as `<name>.gitignore` files in a single
//! directory and are requested by bare name.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::template::TEMPLATE_SUFFIX;
use crate::error::{IgnrError, Result};

static TEMPLATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid template name pattern"));

/// Check whether `name` is acceptable as a local template name.
pub fn is_valid_template_name(name: &str) -> bool {
    TEMPLATE_NAME.is_match(name)
}

/// Directory of locally saved templates.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn template_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}{}", name, TEMPLATE_SUFFIX))
    }

    /// Read a saved template.
    pub fn get(&self, name: &str) -> Result<String> {
        if !is_valid_template_name(name) {
            return Err(IgnrError::LocalTemplateNotFound {
                name: name.to_string(),
            });
        }

        let path = self.template_path(name);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(IgnrError::LocalTemplateNotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Save a template under `name`, replacing any existing one.
    pub fn save(&self, name: &str, content: &str) -> Result<PathBuf> {
        if !is_valid_template_name(name) {
            return Err(IgnrError::InvalidTemplateName {
                name: name.to_string(),
            });
        }

        fs::create_dir_all(&self.root)?;
        let path = self.template_path(name);
        fs::write(&path, content)?;

        Ok(path)
    }

    /// Names of all saved templates, sorted, without the suffix.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry
                .file_name()
                .to_str()
                .and_then(|n| n.strip_suffix(TEMPLATE_SUFFIX))
                .filter(|n| !n.is_empty())
            {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
