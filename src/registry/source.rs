//! Template source collections and prefix resolution.
//!
//! A request prefix maps to a [`SourceCollection`]: one of four built-in
//! collections, or a collection the user registered under a nickname.

use std::collections::BTreeMap;

use crate::error::{IgnrError, Result};

use super::template::SourceLabel;

/// Nickname → remote URL map supplied by the user configuration.
pub type RegisteredSources = BTreeMap<String, String>;

/// A remote location hosting template files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCollection {
    /// Repository owner.
    pub owner: String,
    /// Repository (collection) name.
    pub collection: String,
    /// Path inside the collection to start listing from. Empty for the root.
    pub sub_path: String,
    /// Identity of the listing cache file for this collection.
    pub source_key: String,
}

impl SourceCollection {
    /// Build a collection descriptor.
    pub fn new(
        owner: impl Into<String>,
        collection: impl Into<String>,
        sub_path: impl Into<String>,
        source_key: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            collection: collection.into(),
            sub_path: sub_path.into(),
            source_key: source_key.into(),
        }
    }

    /// Whether this is the same repository as `owner/collection`.
    pub fn is_repo(&self, owner: &str, collection: &str) -> bool {
        self.owner.eq_ignore_ascii_case(owner) && self.collection.eq_ignore_ascii_case(collection)
    }
}

/// The well-known collections addressable by a fixed prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinSource {
    /// `gh`: github/gitignore, whole repository.
    GitHub,
    /// `ghc`: github/gitignore, `community/`.
    GitHubCommunity,
    /// `ghg`: github/gitignore, `Global/`.
    GitHubGlobal,
    /// `tt`: toptal/gitignore, `templates/`.
    TopTal,
}

impl BuiltinSource {
    /// Every built-in source.
    pub const ALL: [BuiltinSource; 4] = [
        Self::GitHub,
        Self::GitHubCommunity,
        Self::GitHubGlobal,
        Self::TopTal,
    ];

    /// Look up a built-in source by its prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.prefix() == prefix)
    }

    /// The request prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::GitHub => "gh",
            Self::GitHubCommunity => "ghc",
            Self::GitHubGlobal => "ghg",
            Self::TopTal => "tt",
        }
    }

    /// The collection descriptor. The prefix doubles as the cache key.
    pub fn collection(self) -> SourceCollection {
        let (owner, collection, sub_path) = match self {
            Self::GitHub => ("github", "gitignore", ""),
            Self::GitHubCommunity => ("github", "gitignore", "community"),
            Self::GitHubGlobal => ("github", "gitignore", "Global"),
            Self::TopTal => ("toptal", "gitignore", "templates"),
        };
        SourceCollection::new(owner, collection, sub_path, self.prefix())
    }
}

/// Check whether a prefix is reserved for a built-in source.
pub fn is_reserved_prefix(prefix: &str) -> bool {
    BuiltinSource::from_prefix(prefix).is_some()
}

/// Pseudo-prefix naming the local template store in `ignr list`.
pub const LOCAL_PREFIX: &str = "local";

/// Resolve a request prefix to a collection.
///
/// Built-in prefixes always win; anything else must be a registered nickname.
pub fn resolve(prefix: &str, registered: &RegisteredSources) -> Result<SourceCollection> {
    if let Some(builtin) = BuiltinSource::from_prefix(prefix) {
        return Ok(builtin.collection());
    }

    match registered.get(prefix) {
        Some(url) => {
            let repo = parse_repo_url(url)?;
            Ok(SourceCollection::new(repo.owner, repo.collection, "", prefix))
        }
        None => Err(IgnrError::UnknownSource {
            prefix: prefix.to_string(),
        }),
    }
}

/// Owner and collection name extracted from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub collection: String,
}

/// Parse a repository URL in browse form (`https://github.com/o/r`) or API
/// form (`https://api.github.com/repos/o/r`).
///
/// Rejects links to single files (`blob/` paths, or a last segment that
/// contains a dot) and URLs with fewer than two path segments.
pub fn parse_repo_url(url: &str) -> Result<RepoRef> {
    let invalid = |reason: &str| IgnrError::InvalidSourceUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = url.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let without_query = without_scheme
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(without_scheme);

    let (host, path) = without_query.split_once('/').unwrap_or((without_query, ""));

    let path = match host.to_ascii_lowercase().as_str() {
        "github.com" | "www.github.com" => path,
        "api.github.com" => path
            .strip_prefix("repos/")
            .ok_or_else(|| invalid("API URLs must start with /repos/"))?,
        _ => return Err(invalid("expected a github.com repository URL")),
    };

    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.contains(&"blob") {
        return Err(invalid("links to a single file, not a collection"));
    }

    if host.eq_ignore_ascii_case("api.github.com") {
        if let Some(idx) = segments.iter().position(|s| *s == "contents") {
            segments.truncate(idx);
        }
    }

    if segments.len() < 2 {
        return Err(invalid("expected owner and collection name"));
    }

    if segments.len() == 2 {
        if let Some(stripped) = segments[1].strip_suffix(".git") {
            segments[1] = stripped;
        }
    }

    if segments.last().is_some_and(|s| s.contains('.')) {
        return Err(invalid("looks like a file rather than a collection"));
    }

    Ok(RepoRef {
        owner: segments[0].to_string(),
        collection: segments[1].to_string(),
    })
}

/// Validate a nickname for a user-registered source.
pub fn validate_nickname(nickname: &str) -> Result<()> {
    let invalid = |reason: &str| IgnrError::InvalidNickname {
        nickname: nickname.to_string(),
        reason: reason.to_string(),
    };

    if nickname.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !nickname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid("must be alphanumeric and contain no spaces"));
    }
    if is_reserved_prefix(nickname) || nickname == LOCAL_PREFIX {
        return Err(invalid("reserved names are gh, ghc, ghg, tt and local"));
    }
    Ok(())
}

/// Find the nickname registered for the same repository as `collection`.
pub fn nickname_for<'a>(
    collection: &SourceCollection,
    registered: &'a RegisteredSources,
) -> Option<&'a str> {
    registered.iter().find_map(|(nickname, url)| {
        parse_repo_url(url)
            .ok()
            .filter(|repo| collection.is_repo(&repo.owner, &repo.collection))
            .map(|_| nickname.as_str())
    })
}

/// Derive the source label for a listed template path.
///
/// Rules, first match wins: a directory segment containing `community`, a
/// directory segment containing `Global`, the github/gitignore collection,
/// the toptal/gitignore collection, a registered nickname, otherwise unknown.
pub fn detect_label(
    collection: &SourceCollection,
    path: &str,
    nickname: Option<&str>,
) -> SourceLabel {
    let dirs: Vec<&str> = match path.rsplit_once('/') {
        Some((parent, _)) => parent.split('/').collect(),
        None => Vec::new(),
    };

    if dirs.iter().any(|d| d.contains("community")) {
        SourceLabel::GitHubCommunity
    } else if dirs.iter().any(|d| d.contains("Global")) {
        SourceLabel::GitHubGlobal
    } else if collection.is_repo("github", "gitignore") {
        SourceLabel::GitHub
    } else if collection.is_repo("toptal", "gitignore") {
        SourceLabel::TopTal
    } else if let Some(nickname) = nickname {
        SourceLabel::User(nickname.to_string())
    } else {
        SourceLabel::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(pairs: &[(&str, &str)]) -> RegisteredSources {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_builtin_prefixes() {
        let none = RegisteredSources::new();

        let gh = resolve("gh", &none).unwrap();
        assert_eq!((gh.owner.as_str(), gh.collection.as_str(), gh.sub_path.as_str()), ("github", "gitignore", ""));

        let ghc = resolve("ghc", &none).unwrap();
        assert_eq!(ghc.sub_path, "community");

        let ghg = resolve("ghg", &none).unwrap();
        assert_eq!(ghg.sub_path, "Global");

        let tt = resolve("tt", &none).unwrap();
        assert_eq!((tt.owner.as_str(), tt.sub_path.as_str()), ("toptal", "templates"));
        assert_eq!(tt.source_key, "tt");
    }

    #[test]
    fn builtin_prefix_shadows_nickname() {
        let sources = registered(&[("gh", "https://github.com/acme/templates")]);
        let gh = resolve("gh", &sources).unwrap();
        assert_eq!(gh.owner, "github");
    }

    #[test]
    fn resolves_registered_nickname() {
        let sources = registered(&[("jc", "https://github.com/jasonuc/gitignore")]);
        let coll = resolve("jc", &sources).unwrap();
        assert_eq!(coll.owner, "jasonuc");
        assert_eq!(coll.collection, "gitignore");
        assert_eq!(coll.sub_path, "");
        assert_eq!(coll.source_key, "jc");
    }

    #[test]
    fn unknown_prefix_names_prefix() {
        let err = resolve("zz", &RegisteredSources::new()).unwrap_err();
        assert!(matches!(err, IgnrError::UnknownSource { ref prefix } if prefix == "zz"));
    }

    #[test]
    fn registered_nickname_with_bad_url_fails() {
        let sources = registered(&[("bad", "https://github.com/onlyowner")]);
        let err = resolve("bad", &sources).unwrap_err();
        assert!(matches!(err, IgnrError::InvalidSourceUrl { .. }));
    }

    #[test]
    fn parses_browse_and_api_forms_identically() {
        let browse = parse_repo_url("https://github.com/acme/templates").unwrap();
        let api = parse_repo_url("https://api.github.com/repos/acme/templates").unwrap();
        assert_eq!(browse, api);
        assert_eq!(browse.owner, "acme");
        assert_eq!(browse.collection, "templates");
    }

    #[test]
    fn strips_trailing_suffixes() {
        for url in [
            "https://github.com/acme/templates/",
            "https://github.com/acme/templates.git",
            "github.com/acme/templates",
            "https://api.github.com/repos/acme/templates/contents",
            "https://api.github.com/repos/acme/templates/contents/",
            "https://github.com/acme/templates?tab=readme",
        ] {
            let repo = parse_repo_url(url).unwrap();
            assert_eq!(repo.owner, "acme", "{}", url);
            assert_eq!(repo.collection, "templates", "{}", url);
        }
    }

    #[test]
    fn rejects_blob_links() {
        let err = parse_repo_url("https://github.com/acme/templates/blob/main/x.gitignore").unwrap_err();
        assert!(matches!(err, IgnrError::InvalidSourceUrl { .. }));
    }

    #[test]
    fn rejects_file_like_last_segment() {
        assert!(parse_repo_url("https://github.com/acme/templates/tree/main/Go.gitignore").is_err());
    }

    #[test]
    fn rejects_too_few_segments() {
        assert!(parse_repo_url("https://github.com/acme").is_err());
        assert!(parse_repo_url("https://github.com/").is_err());
        assert!(parse_repo_url("https://api.github.com/repos/acme").is_err());
    }

    #[test]
    fn rejects_other_hosts() {
        assert!(parse_repo_url("https://gitlab.com/acme/templates").is_err());
    }

    #[test]
    fn nickname_validation() {
        assert!(validate_nickname("jc").is_ok());
        assert!(validate_nickname("my_repo-2").is_ok());
        assert!(validate_nickname("").is_err());
        assert!(validate_nickname("has space").is_err());
        assert!(validate_nickname("tt").is_err());
        assert!(validate_nickname("ghg").is_err());
        assert!(validate_nickname("local").is_err());
    }

    #[test]
    fn labels_by_path_segment() {
        let gh = BuiltinSource::GitHub.collection();
        assert_eq!(detect_label(&gh, "community/Golang/Hugo.gitignore", None), SourceLabel::GitHubCommunity);
        assert_eq!(detect_label(&gh, "Global/macOS.gitignore", None), SourceLabel::GitHubGlobal);
        assert_eq!(detect_label(&gh, "Go.gitignore", None), SourceLabel::GitHub);
    }

    #[test]
    fn file_name_is_not_a_directory_segment() {
        let gh = BuiltinSource::GitHub.collection();
        assert_eq!(detect_label(&gh, "community.gitignore", None), SourceLabel::GitHub);
    }

    #[test]
    fn labels_by_collection() {
        let tt = BuiltinSource::TopTal.collection();
        assert_eq!(detect_label(&tt, "templates/Rust.gitignore", None), SourceLabel::TopTal);

        let user = SourceCollection::new("acme", "templates", "", "mine");
        assert_eq!(detect_label(&user, "Rust.gitignore", Some("mine")), SourceLabel::User("mine".into()));
        assert_eq!(detect_label(&user, "Rust.gitignore", None), SourceLabel::Unknown);
    }

    #[test]
    fn finds_nickname_for_collection() {
        let sources = registered(&[
            ("other", "https://github.com/someone/else"),
            ("mine", "https://api.github.com/repos/Acme/Templates"),
        ]);
        let coll = SourceCollection::new("acme", "templates", "", "mine");
        assert_eq!(nickname_for(&coll, &sources), Some("mine"));
    }
}
