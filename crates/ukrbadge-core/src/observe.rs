//! Resolution events and the observer that reports them.
//!
//! The resolver never logs directly. It emits `ResolveEvent`s to one injected
//! `ResolveObserver`; `TracingObserver` turns them into `tracing` records.

use std::fmt;

use crate::fetch::NetworkKind;
use crate::search::Layer;
use crate::types::{LookupResult, StatusTag};

/// Why a branch of the lookup settled on NONE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// DNS, refused connection, timeout, cancellation.
    Network(NetworkKind),
    /// Non-2xx status that the protocol does not handle specially.
    UnexpectedStatus(u32),
    /// Search page structure matched neither extraction pattern.
    ParseFailure,
    /// Best candidate cost more than the acceptance threshold.
    AmbiguousMatch { best_cost: usize },
    /// Winning link could not be joined against the base URL.
    InvalidLink,
    /// Page loaded but carries no entry marker.
    NotAnEntry,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Network(kind) => write!(f, "network failure ({})", kind.as_str()),
            Failure::UnexpectedStatus(code) => write!(f, "unexpected HTTP {}", code),
            Failure::ParseFailure => write!(f, "no candidates in search results"),
            Failure::AmbiguousMatch { best_cost } => {
                write!(f, "no confident match (best cost {})", best_cost)
            }
            Failure::InvalidLink => write!(f, "invalid candidate link"),
            Failure::NotAnEntry => write!(f, "page is not a catalog entry"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolveEvent<'a> {
    Started { title: &'a str, slug: &'a str },
    /// Nothing alphanumeric in the title; no request was made.
    EmptySlug { title: &'a str },
    DirectHit { url: &'a str, status: StatusTag },
    /// 404; search fallback follows.
    DirectMiss { url: &'a str },
    DirectFailed { url: &'a str, failure: Failure },
    SearchStarted { url: &'a str },
    CandidatesExtracted { count: usize, layer: Layer },
    BestMatch { title: &'a str, link: &'a str, cost: usize },
    SearchFailed { url: &'a str, failure: Failure },
    Verified { url: &'a str, status: StatusTag },
    VerifyFailed { url: &'a str, failure: Failure },
    Finished { title: &'a str, result: &'a LookupResult },
}

/// Receives every event of every resolution. Must tolerate concurrent calls.
pub trait ResolveObserver: Send + Sync {
    fn on_event(&self, event: &ResolveEvent<'_>);
}

/// Reports events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResolveObserver for TracingObserver {
    fn on_event(&self, event: &ResolveEvent<'_>) {
        match event {
            ResolveEvent::Started { title, slug } => {
                tracing::debug!(%title, %slug, "resolving");
            }
            ResolveEvent::EmptySlug { title } => {
                tracing::info!(%title, "title has no alphanumerics; skipping lookup");
            }
            ResolveEvent::DirectHit { url, status } => {
                tracing::info!(%url, %status, "direct link hit");
            }
            ResolveEvent::DirectMiss { url } => {
                tracing::info!(%url, "direct link miss; searching");
            }
            ResolveEvent::DirectFailed { url, failure } => {
                tracing::warn!(%url, "direct lookup failed: {}", failure);
            }
            ResolveEvent::SearchStarted { url } => {
                tracing::debug!(%url, "searching catalog");
            }
            ResolveEvent::CandidatesExtracted { count, layer } => {
                tracing::debug!(count, ?layer, "extracted search candidates");
            }
            ResolveEvent::BestMatch { title, link, cost } => {
                tracing::info!(%title, %link, cost, "best match");
            }
            ResolveEvent::SearchFailed { url, failure } => {
                tracing::info!(%url, "search gave no result: {}", failure);
            }
            ResolveEvent::Verified { url, status } => {
                tracing::info!(%url, %status, "verified search match");
            }
            ResolveEvent::VerifyFailed { url, failure } => {
                tracing::info!(%url, "verification failed: {}", failure);
            }
            ResolveEvent::Finished { title, result } => {
                tracing::debug!(%title, status = %result.status(), url = %result.url(), "resolved");
            }
        }
    }
}

/// Collects event descriptions; for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingObserver {
    events: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ResolveObserver for RecordingObserver {
    fn on_event(&self, event: &ResolveEvent<'_>) {
        self.events.lock().unwrap().push(format!("{event:?}"));
    }
}
