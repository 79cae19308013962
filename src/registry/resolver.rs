//! Template resolution across remote collections and the local store.
//!
//! A request token is either `prefix:name` or a bare local name:
//! 1. Bare names are read from the [`LocalStore`]
//! 2. A prefix is resolved to a [`SourceCollection`]
//! 3. The collection listing is taken from the cache, or fetched and cached
//! 4. The entry matching `name` is located (exact, then case-insensitive)
//! 5. Its content is returned through the [`ContentResolver`]

use crate::cache::{ContentCache, TemplateCache};
use crate::config::{Settings, UserConfig};
use crate::error::{IgnrError, Result};
use crate::registry::content::ContentResolver;
use crate::registry::fetch::{GithubClient, HttpFetcher};
use crate::registry::local::LocalStore;
use crate::registry::source::{self, BuiltinSource, RegisteredSources, SourceCollection};
use crate::registry::template::{find_template, SourceLabel, TemplateEntry, TemplateRequest};

/// Built-in collections whose listings are warmed eagerly. The root `gh`
/// listing already carries the `community/` and `Global/` entries.
pub const WARM_SOURCES: [BuiltinSource; 2] = [BuiltinSource::GitHub, BuiltinSource::TopTal];

/// Content resolved for one request token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// The token as requested.
    pub token: String,
    /// Raw template content.
    pub content: String,
}

/// Outcome of resolving a batch of tokens.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Successfully resolved tokens, in request order.
    pub resolved: Vec<ResolvedTemplate>,
    /// One error per failed token, each carrying its token.
    pub failures: Vec<IgnrError>,
}

impl Resolution {
    /// Whether every token resolved.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Template registry that resolves request tokens to content.
#[derive(Debug, Clone)]
pub struct Registry {
    github: GithubClient,
    listings: TemplateCache,
    content: ContentResolver,
    local: LocalStore,
    sources: RegisteredSources,
}

impl Registry {
    /// Assemble a registry from its parts.
    pub fn new(
        github: GithubClient,
        listings: TemplateCache,
        content: ContentResolver,
        local: LocalStore,
        sources: RegisteredSources,
    ) -> Self {
        Self {
            github,
            listings,
            content,
            local,
            sources,
        }
    }

    /// Build a registry for the given settings and user configuration.
    pub fn from_settings(settings: &Settings, config: &UserConfig) -> Result<Self> {
        let github = GithubClient::with_api_url(&settings.api_url)?
            .with_token(settings.github_token.clone());
        let content = ContentResolver::new(
            HttpFetcher::new()?,
            ContentCache::new(settings.cache_dir()),
        );

        Ok(Self::new(
            github,
            TemplateCache::new(settings.listing_cache_dir()),
            content,
            LocalStore::new(settings.template_dir(config)),
            config.repositories.clone(),
        ))
    }

    /// Registered collections.
    pub fn sources(&self) -> &RegisteredSources {
        &self.sources
    }

    /// The listing cache.
    pub fn listings(&self) -> &TemplateCache {
        &self.listings
    }

    /// The content resolver.
    pub fn content(&self) -> &ContentResolver {
        &self.content
    }

    /// The local template store.
    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// The listing for a collection, cache first.
    ///
    /// A fresh cache record is returned without network access. Otherwise the
    /// collection is fetched and the cache updated.
    pub fn listing(&self, collection: &SourceCollection) -> Result<Vec<TemplateEntry>> {
        let cached = self.listings.load(&collection.source_key);
        if cached.fresh {
            return Ok(cached.entries);
        }

        self.refresh(collection)
    }

    /// Fetch a collection's listing regardless of cache age and save it.
    ///
    /// Returns the listing as persisted, which includes entries merged from
    /// a still-fresh record. If persisting fails the fetched entries are
    /// returned as-is.
    pub fn refresh(&self, collection: &SourceCollection) -> Result<Vec<TemplateEntry>> {
        let entries = self.github.list_templates(collection, &self.sources)?;

        match self.listings.save(&collection.source_key, entries.clone()) {
            Ok(record) => Ok(record.templates),
            Err(e) => {
                tracing::warn!(
                    "Failed to cache listing for {}: {}",
                    collection.source_key,
                    e
                );
                Ok(entries)
            }
        }
    }

    /// Resolve one request token to template content.
    ///
    /// Any error is wrapped with the token.
    pub fn resolve_one(&self, token: &str) -> Result<String> {
        self.resolve_request(&TemplateRequest::parse(token))
            .map_err(|e| e.for_token(token))
    }

    fn resolve_request(&self, request: &TemplateRequest) -> Result<String> {
        match request {
            TemplateRequest::Local { name } => self.local.get(name),
            TemplateRequest::Remote { prefix, name } => {
                let collection = source::resolve(prefix, &self.sources)?;
                let entries = self.listing(&collection)?;
                let entry = find_template(name, &entries, &collection.source_key)?;

                tracing::debug!("Resolved {}:{} to {}", prefix, name, entry.path);
                self.content.get_content(&entry.content_ref)
            }
        }
    }

    /// Resolve every token, collecting failures instead of stopping.
    pub fn resolve_many<I, S>(&self, tokens: I) -> Resolution
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolution = Resolution::default();

        for token in tokens {
            let token = token.as_ref();
            match self.resolve_one(token) {
                Ok(content) => resolution.resolved.push(ResolvedTemplate {
                    token: token.to_string(),
                    content,
                }),
                Err(e) => {
                    tracing::debug!("Failed to resolve {}: {}", token, e);
                    resolution.failures.push(e);
                }
            }
        }

        resolution
    }

    /// Collections browsed by `list` and `search`: the warmed built-ins
    /// followed by every registered collection.
    ///
    /// Registered entries whose URL does not parse are reported as errors.
    pub fn browse_collections(&self) -> Vec<Result<SourceCollection>> {
        WARM_SOURCES
            .iter()
            .map(|b| Ok(b.collection()))
            .chain(
                self.sources
                    .keys()
                    .map(|nickname| source::resolve(nickname, &self.sources)),
            )
            .collect()
    }

    /// Make listings available ahead of browsing.
    ///
    /// Warmed built-ins are loaded cache first. Registered collections are
    /// refetched when `refresh_registered` is set and loaded cache first
    /// otherwise. Failures are returned, never raised.
    pub fn warm_up(&self, refresh_registered: bool) -> Vec<IgnrError> {
        let mut warnings = Vec::new();

        for builtin in WARM_SOURCES {
            if let Err(e) = self.listing(&builtin.collection()) {
                tracing::warn!("Failed to load {} templates: {}", builtin.prefix(), e);
                warnings.push(e.for_token(builtin.prefix()));
            }
        }

        for nickname in self.sources.keys() {
            let result = source::resolve(nickname, &self.sources).and_then(|collection| {
                if refresh_registered {
                    self.refresh(&collection)
                } else {
                    self.listing(&collection)
                }
            });

            if let Err(e) = result {
                tracing::warn!("Failed to load {} templates: {}", nickname, e);
                warnings.push(e.for_token(nickname.as_str()));
            }
        }

        warnings
    }

    /// Entries currently cached for a collection, fresh or not.
    pub fn cached_entries(&self, collection: &SourceCollection) -> Vec<TemplateEntry> {
        self.listings.load(&collection.source_key).entries
    }

    /// The request token that addresses `entry`, listed from the collection
    /// cached under `source_key`.
    ///
    /// Only the root `gh` listing spans several prefixes; its entries take
    /// the prefix of their source label. Every other collection, registered
    /// nicknames included, is addressed by its own key.
    pub fn token_for(&self, entry: &TemplateEntry, source_key: &str) -> String {
        let prefix = if source_key == BuiltinSource::GitHub.prefix() {
            let label = SourceLabel::parse(&entry.source_label, self.sources.keys());
            label.prefix().unwrap_or(source_key).to_string()
        } else {
            source_key.to_string()
        };
        format!("{}:{}", prefix, entry.display_name())
    }
}
