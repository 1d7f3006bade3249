//! Direct lookup: guess the entry URL from the slug.

use crate::classify::classify;
use crate::fetch::PageFetcher;
use crate::observe::{Failure, ResolveEvent, ResolveObserver};
use crate::resolver::ResolverConfig;
use crate::types::{LookupResult, StatusTag};

pub struct DirectLookupClient<'a, F> {
    fetcher: &'a F,
    config: &'a ResolverConfig,
    observer: &'a dyn ResolveObserver,
}

impl<'a, F: PageFetcher> DirectLookupClient<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a ResolverConfig, observer: &'a dyn ResolveObserver) -> Self {
        Self {
            fetcher,
            config,
            observer,
        }
    }

    /// Fetches `{base_url}/{slug}`.
    ///
    /// Returns `None` only for HTTP 404, meaning the search fallback should
    /// run. Every other outcome is terminal: a 2xx page is classified (NONE
    /// included, even for a "page not found" body), anything else is NONE.
    pub async fn lookup(&self, slug: &str) -> Option<LookupResult> {
        let url = self.config.entry_url(slug);
        let page = match self.fetcher.get(&url).await {
            Ok(page) => page,
            Err(e) => return Some(self.failed(&url, Failure::Network(e.kind()))),
        };

        if page.status == 404 {
            self.observer.on_event(&ResolveEvent::DirectMiss { url: &url });
            return None;
        }
        if !page.is_success() {
            return Some(self.failed(&url, Failure::UnexpectedStatus(page.status)));
        }

        let status = classify(&page.body, &self.config.markers);
        if status == StatusTag::None {
            return Some(self.failed(&url, Failure::NotAnEntry));
        }
        self.observer
            .on_event(&ResolveEvent::DirectHit { url: &url, status });
        Some(LookupResult::found(status, url))
    }

    fn failed(&self, url: &str, failure: Failure) -> LookupResult {
        self.observer
            .on_event(&ResolveEvent::DirectFailed { url, failure });
        LookupResult::none()
    }
}
