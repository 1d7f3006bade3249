//! Title → localization status resolution.
//!
//! `Resolver::resolve` runs a small state machine per call:
//!
//! ```text
//! Start ──(empty slug)──────────────────────────► Done(NONE)
//!   │
//!   ▼
//! Direct ──(page, error, or non-404 status)─────► Done(result)
//!   │ 404
//!   ▼
//! Fallback ─────────────────────────────────────► Done(search result)
//! ```
//!
//! Nothing is cached or shared between calls, so one resolver can serve many
//! concurrent resolutions.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::classify::Markers;
use crate::config::{BadgeConfig, DEFAULT_BASE_URL};
use crate::direct::DirectLookupClient;
use crate::fetch::{CurlFetcher, PageFetcher};
use crate::normalize::normalize;
use crate::observe::{ResolveEvent, ResolveObserver, TracingObserver};
use crate::score::ScoringConfig;
use crate::search::{CandidateExtractor, SearchConfig, SearchFallbackClient};
use crate::types::LookupResult;

/// Static configuration of a resolver. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub base_url: String,
    pub search: SearchConfig,
    pub markers: Markers,
    pub scoring: ScoringConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search: SearchConfig::default(),
            markers: Markers::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl From<&BadgeConfig> for ResolverConfig {
    fn from(cfg: &BadgeConfig) -> Self {
        Self {
            base_url: cfg.catalog.base_url.clone(),
            search: cfg.search.clone(),
            markers: cfg.markers.clone(),
            scoring: cfg.scoring,
        }
    }
}

impl ResolverConfig {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `{base_url}/{slug}`
    pub fn entry_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base(), slug)
    }

    /// `{base_url}{search.path}?{search.query_param}={percent-encoded title}`
    pub fn search_url(&self, title: &str) -> String {
        format!(
            "{}/{}?{}={}",
            self.base(),
            self.search.path.trim_start_matches('/'),
            self.search.query_param,
            urlencoding::encode(title)
        )
    }

    /// Resolves a relative or absolute link against the base URL.
    pub fn absolute_link(&self, link: &str) -> Option<String> {
        let base = url::Url::parse(&self.base_url).ok()?;
        let joined = base.join(link).ok()?;
        match joined.scheme() {
            "http" | "https" => Some(joined.to_string()),
            _ => None,
        }
    }
}

enum State {
    Start,
    Direct(String),
    Fallback,
    Done(LookupResult),
}

/// Resolves titles against the catalog. Cheap to share behind an `Arc`.
pub struct Resolver<F = CurlFetcher> {
    config: ResolverConfig,
    fetcher: F,
    extractor: CandidateExtractor,
    observer: Arc<dyn ResolveObserver>,
}

impl Resolver<CurlFetcher> {
    /// Resolver over libcurl with settings from the loaded config file.
    pub fn from_config(cfg: &BadgeConfig) -> Result<Self> {
        let fetcher = CurlFetcher::new(cfg.catalog.fetch_options());
        Self::new(ResolverConfig::from(cfg), fetcher)
    }
}

impl<F: PageFetcher> Resolver<F> {
    pub fn new(config: ResolverConfig, fetcher: F) -> Result<Self> {
        url::Url::parse(&config.base_url)
            .with_context(|| format!("invalid catalog base URL: {}", config.base_url))?;
        let extractor =
            CandidateExtractor::new(&config.search).context("build search result selectors")?;
        Ok(Self {
            config,
            fetcher,
            extractor,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replaces the default `TracingObserver`.
    pub fn with_observer(mut self, observer: Arc<dyn ResolveObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves one title. Never fails; every failure ends in NONE.
    ///
    /// Dropping the returned future cancels any in-flight fetch.
    pub async fn resolve(&self, title: &str) -> LookupResult {
        let observer = self.observer.as_ref();
        let mut state = State::Start;
        loop {
            state = match state {
                State::Start => {
                    let slug = normalize(title);
                    if slug.is_empty() {
                        observer.on_event(&ResolveEvent::EmptySlug { title });
                        State::Done(LookupResult::none())
                    } else {
                        observer.on_event(&ResolveEvent::Started { title, slug: &slug });
                        State::Direct(slug)
                    }
                }
                State::Direct(slug) => {
                    let direct = DirectLookupClient::new(&self.fetcher, &self.config, observer);
                    match direct.lookup(&slug).await {
                        Some(result) => State::Done(result),
                        None => State::Fallback,
                    }
                }
                State::Fallback => {
                    let search = SearchFallbackClient::new(
                        &self.fetcher,
                        &self.config,
                        &self.extractor,
                        observer,
                    );
                    State::Done(search.search(title).await)
                }
                State::Done(result) => {
                    observer.on_event(&ResolveEvent::Finished {
                        title,
                        result: &result,
                    });
                    return result;
                }
            };
        }
    }
}
