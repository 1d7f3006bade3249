//! HTTP page fetching for catalog lookups.
//!
//! `PageFetcher` is the seam between the resolver and the network. The
//! production implementation, `CurlFetcher`, runs one libcurl transfer per
//! call on tokio's blocking pool. Dropping the returned future sets the
//! transfer's abort token, so a cancelled resolution stops its in-flight
//! request instead of leaving it to run out the timeout.

mod error;
mod transfer;

#[cfg(test)]
pub(crate) mod fake;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub use error::{classify_curl_error, FetchError, NetworkKind};
pub use transfer::fetch_blocking;

/// One completed HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u32,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Per-request settings shared by every catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Total time allowed for one request.
    pub timeout: Duration,
    pub user_agent: String,
    /// Responses larger than this are abandoned.
    pub max_body_bytes: usize,
    pub max_redirects: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 4 * 1024 * 1024,
            max_redirects: 5,
        }
    }
}

/// Issues read-only GETs. Implementations must not retry.
pub trait PageFetcher: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<PageResponse, FetchError>> + Send;
}

/// Sets the abort token when dropped.
struct AbortOnDrop(Arc<AtomicBool>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    options: FetchOptions,
}

impl CurlFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }
}

impl PageFetcher for CurlFetcher {
    async fn get(&self, url: &str) -> Result<PageResponse, FetchError> {
        let url = url.to_string();
        let options = self.options.clone();
        let abort = Arc::new(AtomicBool::new(false));
        let task_abort = Arc::clone(&abort);
        let _guard = AbortOnDrop(abort);

        tokio::task::spawn_blocking(move || fetch_blocking(&url, &options, &task_abort))
            .await
            .map_err(|e| FetchError::Join(e.to_string()))?
    }
}

impl<F: PageFetcher> PageFetcher for Arc<F> {
    fn get(&self, url: &str) -> impl Future<Output = Result<PageResponse, FetchError>> + Send {
        (**self).get(url)
    }
}
