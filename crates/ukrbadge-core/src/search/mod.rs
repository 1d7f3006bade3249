//! Search fallback: query the catalog's search page, pick the best result,
//! and confirm it by fetching the entry page.

mod extract;

use serde::{Deserialize, Serialize};

use crate::classify::{classify, page_exists};
use crate::fetch::PageFetcher;
use crate::observe::{Failure, ResolveEvent, ResolveObserver};
use crate::resolver::ResolverConfig;
use crate::score::{self, Rejection};
use crate::types::LookupResult;

pub use extract::{CandidateExtractor, Extraction, ExtractorError, Layer};

/// Search endpoint and result markup (optional `[search]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Path of the search page, relative to the base URL.
    pub path: String,
    /// Query parameter carrying the title.
    pub query_param: String,
    /// Class of each result block.
    pub item_class: String,
    /// Class of the element holding a result's title.
    pub title_class: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            path: "/games".to_string(),
            query_param: "query".to_string(),
            item_class: "product-item".to_string(),
            title_class: "product-title".to_string(),
        }
    }
}

/// Runs one search-and-verify pass for a title. Borrowed from the resolver per call.
pub struct SearchFallbackClient<'a, F> {
    fetcher: &'a F,
    config: &'a ResolverConfig,
    extractor: &'a CandidateExtractor,
    observer: &'a dyn ResolveObserver,
}

impl<'a, F: PageFetcher> SearchFallbackClient<'a, F> {
    pub fn new(
        fetcher: &'a F,
        config: &'a ResolverConfig,
        extractor: &'a CandidateExtractor,
        observer: &'a dyn ResolveObserver,
    ) -> Self {
        Self {
            fetcher,
            config,
            extractor,
            observer,
        }
    }

    /// Searches for the raw (un-normalized) title. Always terminal.
    pub async fn search(&self, title: &str) -> LookupResult {
        let url = self.config.search_url(title);
        self.observer.on_event(&ResolveEvent::SearchStarted { url: &url });

        let page = match self.fetcher.get(&url).await {
            Ok(page) => page,
            Err(e) => return self.search_failed(&url, Failure::Network(e.kind())),
        };
        if !page.is_success() {
            return self.search_failed(&url, Failure::UnexpectedStatus(page.status));
        }

        let extraction = self.extractor.extract(&page.body);
        self.observer.on_event(&ResolveEvent::CandidatesExtracted {
            count: extraction.candidates.len(),
            layer: extraction.layer,
        });

        let threshold = self.config.scoring.acceptance_threshold;
        let best = match score::select(title, &extraction.candidates, threshold) {
            Ok(best) => best,
            Err(Rejection::NoCandidates) => return self.search_failed(&url, Failure::ParseFailure),
            Err(Rejection::AboveThreshold { best_cost }) => {
                return self.search_failed(&url, Failure::AmbiguousMatch { best_cost })
            }
        };
        self.observer.on_event(&ResolveEvent::BestMatch {
            title: &best.candidate.title,
            link: &best.candidate.link,
            cost: best.cost,
        });

        let Some(entry_url) = self.config.absolute_link(&best.candidate.link) else {
            return self.search_failed(&url, Failure::InvalidLink);
        };
        self.verify(&entry_url).await
    }

    async fn verify(&self, url: &str) -> LookupResult {
        let page = match self.fetcher.get(url).await {
            Ok(page) => page,
            Err(e) => return self.verify_failed(url, Failure::Network(e.kind())),
        };
        if !page.is_success() {
            return self.verify_failed(url, Failure::UnexpectedStatus(page.status));
        }
        let markers = &self.config.markers;
        if !page_exists(&page.body, markers) {
            return self.verify_failed(url, Failure::NotAnEntry);
        }

        let status = classify(&page.body, markers);
        self.observer
            .on_event(&ResolveEvent::Verified { url, status });
        LookupResult::found(status, url)
    }

    fn search_failed(&self, url: &str, failure: Failure) -> LookupResult {
        self.observer
            .on_event(&ResolveEvent::SearchFailed { url, failure });
        LookupResult::none()
    }

    fn verify_failed(&self, url: &str, failure: Failure) -> LookupResult {
        self.observer
            .on_event(&ResolveEvent::VerifyFailed { url, failure });
        LookupResult::none()
    }
}
