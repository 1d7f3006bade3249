//! Fetch errors and their network-failure classification.

use thiserror::Error;

/// Error returned by a single page fetch. No partial body is ever attached.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, DNS, connection reset, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The caller dropped the fetch (cancelled resolution) before it finished.
    #[error("fetch aborted")]
    Aborted,
    /// Response body exceeded the configured cap.
    #[error("response body exceeded {limit} bytes")]
    BodyTooLarge { limit: usize },
    /// The blocking task panicked or was cancelled by the runtime.
    #[error("fetch task join: {0}")]
    Join(String),
}

/// Coarse classification used when reporting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    /// Connect or transfer timed out.
    Timeout,
    /// DNS, refused connection, reset, empty reply.
    Connection,
    /// Cancelled by the caller.
    Aborted,
    Other,
}

impl NetworkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkKind::Timeout => "timeout",
            NetworkKind::Connection => "connection",
            NetworkKind::Aborted => "aborted",
            NetworkKind::Other => "other",
        }
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> NetworkKind {
    if e.is_operation_timedout() {
        return NetworkKind::Timeout;
    }
    if e.is_aborted_by_callback() {
        return NetworkKind::Aborted;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return NetworkKind::Connection;
    }
    NetworkKind::Other
}

impl FetchError {
    pub fn kind(&self) -> NetworkKind {
        match self {
            FetchError::Curl(e) => classify_curl_error(e),
            FetchError::Aborted => NetworkKind::Aborted,
            FetchError::BodyTooLarge { .. } | FetchError::Join(_) => NetworkKind::Other,
        }
    }
}
