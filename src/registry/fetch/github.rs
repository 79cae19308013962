//! Template listing through the GitHub repository contents API.
//!
//! Directories are walked recursively. Each subdirectory is fetched on its
//! own scoped thread and the parent waits for all of them before returning.
//! A failing subtree is logged and contributes nothing; only a failure at the
//! starting path fails the listing.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use super::build_client;
use crate::error::{IgnrError, Result};
use crate::registry::source::{detect_label, nickname_for, RegisteredSources, SourceCollection};
use crate::registry::template::{TemplateEntry, TEMPLATE_SUFFIX};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Timeout for a single contents request.
pub const LISTING_TIMEOUT: Duration = Duration::from_secs(30);

/// Directories nested deeper than this below the starting path are skipped.
pub const MAX_DEPTH: usize = 16;

/// One item of a contents response.
#[derive(Debug, Clone, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: ItemKind,
    #[serde(default)]
    download_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ItemKind {
    File,
    #[serde(alias = "directory")]
    Dir,
    #[serde(other)]
    Other,
}

/// The contents API answers with an object for a file and an array for a
/// directory.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Contents {
    Listing(Vec<ContentItem>),
    Single(ContentItem),
}

fn is_template_file(name: &str) -> bool {
    name.ends_with(TEMPLATE_SUFFIX)
}

/// Client for the repository contents API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client for the public GitHub API.
    pub fn new() -> Result<Self> {
        Self::with_api_url(DEFAULT_API_URL)
    }

    /// Create a client for a custom API endpoint.
    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(LISTING_TIMEOUT)?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Authenticate requests with a bearer token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Get the API endpoint.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/repos/{}/{}/contents", self.api_url, owner, repo)
        } else {
            format!("{}/repos/{}/{}/contents/{}", self.api_url, owner, repo, path)
        }
    }

    fn get_contents(&self, owner: &str, repo: &str, path: &str) -> Result<Contents> {
        let url = self.contents_url(owner, repo, path);
        tracing::debug!("Listing {}", url);

        let fetch_err = |reason: String| IgnrError::Fetch {
            url: url.clone(),
            reason,
        };

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| fetch_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }

        response
            .json::<Contents>()
            .map_err(|e| fetch_err(format!("unexpected response: {}", e)))
    }

    /// List every template file in a collection, starting at its sub-path.
    ///
    /// Entries are labelled by [`detect_label`]; `registered` is consulted to
    /// label collections that belong to a user nickname. The result is sorted
    /// by path.
    pub fn list_templates(
        &self,
        collection: &SourceCollection,
        registered: &RegisteredSources,
    ) -> Result<Vec<TemplateEntry>> {
        let walk = Walk {
            client: self,
            collection,
            nickname: nickname_for(collection, registered),
            seen: Mutex::new(HashSet::from([collection.sub_path.clone()])),
            found: Mutex::new(Vec::new()),
        };

        walk.visit(&collection.sub_path, 0)?;

        let mut found = walk.found.into_inner().unwrap_or_else(PoisonError::into_inner);
        found.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!(
            "Listed {} templates in {}/{}",
            found.len(),
            collection.owner,
            collection.collection
        );
        Ok(found)
    }

    /// Check whether a repository root holds at least one named template
    /// file. A bare `.gitignore` does not count.
    pub fn has_templates(&self, owner: &str, repo: &str) -> Result<bool> {
        Ok(match self.get_contents(owner, repo, "")? {
            Contents::Listing(items) => items.iter().any(|item| {
                item.kind == ItemKind::File
                    && is_template_file(&item.name)
                    && item.name != TEMPLATE_SUFFIX
            }),
            Contents::Single(_) => false,
        })
    }
}

/// Shared state of one recursive listing.
struct Walk<'a> {
    client: &'a GithubClient,
    collection: &'a SourceCollection,
    nickname: Option<&'a str>,
    seen: Mutex<HashSet<String>>,
    found: Mutex<Vec<TemplateEntry>>,
}

impl Walk<'_> {
    fn visit(&self, path: &str, depth: usize) -> Result<()> {
        let items = match self.client.get_contents(
            &self.collection.owner,
            &self.collection.collection,
            path,
        )? {
            Contents::Single(item) => {
                if item.kind == ItemKind::File && is_template_file(&item.name) {
                    self.record(item);
                }
                return Ok(());
            }
            Contents::Listing(items) => items,
        };

        let mut subdirs = Vec::new();
        for item in items {
            match item.kind {
                ItemKind::File if is_template_file(&item.name) => self.record(item),
                ItemKind::Dir => subdirs.push(item.path),
                _ => {}
            }
        }

        if depth >= MAX_DEPTH {
            if !subdirs.is_empty() {
                tracing::warn!("Not descending below {}: nesting too deep", path);
            }
            return Ok(());
        }

        subdirs.retain(|dir| self.first_visit(dir));

        thread::scope(|scope| {
            for dir in &subdirs {
                scope.spawn(move || {
                    if let Err(e) = self.visit(dir, depth + 1) {
                        tracing::warn!("Skipping {}: {}", dir, e);
                    }
                });
            }
        });

        Ok(())
    }

    fn first_visit(&self, path: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string())
    }

    fn record(&self, item: ContentItem) {
        let Some(content_ref) = item.download_url else {
            tracing::debug!("Skipping {}: no download URL", item.path);
            return;
        };

        let entry = TemplateEntry {
            source_label: detect_label(self.collection, &item.path, self.nickname).to_string(),
            name: item.name,
            path: item.path,
            content_ref,
        };

        self.found
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::source::BuiltinSource;
    use httpmock::prelude::*;
    use serde_json::json;

    fn file(server: &MockServer, path: &str) -> serde_json::Value {
        let name = path.rsplit('/').next().unwrap();
        json!({
            "name": name,
            "path": path,
            "type": "file",
            "download_url": server.url(format!("/raw/{}", path)),
        })
    }

    fn dir(path: &str) -> serde_json::Value {
        let name = path.rsplit('/').next().unwrap();
        json!({ "name": name, "path": path, "type": "dir", "download_url": null })
    }

    fn acme() -> SourceCollection {
        SourceCollection::new("acme", "templates", "", "acme")
    }

    fn names(entries: &[TemplateEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn contents_url_format() {
        let client = GithubClient::with_api_url("https://api.example.com/").unwrap();
        assert_eq!(
            client.contents_url("o", "r", ""),
            "https://api.example.com/repos/o/r/contents"
        );
        assert_eq!(
            client.contents_url("o", "r", "/Global/"),
            "https://api.example.com/repos/o/r/contents/Global"
        );
    }

    #[test]
    fn lists_recursively_and_filters_suffix() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, "a.gitignore"), dir("sub")]).to_string());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents/sub");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, "sub/b.gitignore"), file(&server, "sub/c.txt")]).to_string());
        });

        let client = GithubClient::with_api_url(server.base_url()).unwrap();
        let entries = client
            .list_templates(&acme(), &RegisteredSources::new())
            .unwrap();

        assert_eq!(names(&entries), vec!["a.gitignore", "sub/b.gitignore"]);
        assert_eq!(entries[1].content_ref, server.url("/raw/sub/b.gitignore"));
    }

    #[test]
    fn failed_subtree_is_skipped() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, "a.gitignore"), dir("sub")]).to_string());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents/sub");
            then.status(500);
        });

        let client = GithubClient::with_api_url(server.base_url()).unwrap();
        let entries = client
            .list_templates(&acme(), &RegisteredSources::new())
            .unwrap();

        assert_eq!(names(&entries), vec!["a.gitignore"]);
    }

    #[test]
    fn failed_root_fails_listing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents");
            then.status(403);
        });

        let client = GithubClient::with_api_url(server.base_url()).unwrap();
        let err = client
            .list_templates(&acme(), &RegisteredSources::new())
            .unwrap_err();

        match err {
            IgnrError::Fetch { reason, .. } => assert!(reason.contains("403")),
            other => panic!("Expected fetch error, got {:?}", other),
        }
    }

    #[test]
    fn single_file_target() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents/Go.gitignore");
            then.status(200)
                .header("content-type", "application/json")
                .body(file(&server, "Go.gitignore").to_string());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents/README.md");
            then.status(200)
                .header("content-type", "application/json")
                .body(file(&server, "README.md").to_string());
        });

        let client = GithubClient::with_api_url(server.base_url()).unwrap();
        let none = RegisteredSources::new();

        let go = SourceCollection::new("acme", "templates", "Go.gitignore", "x");
        assert_eq!(names(&client.list_templates(&go, &none).unwrap()), vec!["Go.gitignore"]);

        let readme = SourceCollection::new("acme", "templates", "README.md", "x");
        assert!(client.list_templates(&readme, &none).unwrap().is_empty());
    }

    #[test]
    fn revisited_directory_is_not_fetched_twice() {
        let server = MockServer::start();
        let root = server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, "a.gitignore"), dir("")]).to_string());
        });

        let client = GithubClient::with_api_url(server.base_url()).unwrap();
        let entries = client
            .list_templates(&acme(), &RegisteredSources::new())
            .unwrap();

        assert_eq!(entries.len(), 1);
        root.assert_calls(1);
    }

    #[test]
    fn labels_builtin_and_user_entries() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/github/gitignore/contents");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, "Go.gitignore"), dir("Global")]).to_string());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/github/gitignore/contents/Global");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, "Global/macOS.gitignore")]).to_string());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, "Rust.gitignore")]).to_string());
        });

        let client = GithubClient::with_api_url(server.base_url()).unwrap();
        let mut registered = RegisteredSources::new();
        registered.insert("mine".into(), "https://github.com/acme/templates".into());

        let gh = client
            .list_templates(&BuiltinSource::GitHub.collection(), &registered)
            .unwrap();
        let label_of = |path: &str| {
            gh.iter()
                .find(|e| e.path == path)
                .map(|e| e.source_label.clone())
                .unwrap()
        };
        assert_eq!(label_of("Go.gitignore"), "GitHub");
        assert_eq!(label_of("Global/macOS.gitignore"), "GitHub Global");

        let mine = client.list_templates(&acme(), &registered).unwrap();
        assert_eq!(mine[0].source_label, "mine");
    }

    #[test]
    fn sends_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/templates/contents")
                .header("Authorization", "Bearer secret-token");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        });

        let client = GithubClient::with_api_url(server.base_url())
            .unwrap()
            .with_token(Some("secret-token".into()));
        client
            .list_templates(&acme(), &RegisteredSources::new())
            .unwrap();

        mock.assert();
    }

    #[test]
    fn has_templates_ignores_bare_gitignore() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/plain/contents");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, ".gitignore"), file(&server, "README.md")]).to_string());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/templates/contents");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([file(&server, "node.gitignore")]).to_string());
        });

        let client = GithubClient::with_api_url(server.base_url()).unwrap();
        assert!(!client.has_templates("acme", "plain").unwrap());
        assert!(client.has_templates("acme", "templates").unwrap());
    }
}
