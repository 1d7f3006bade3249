//! Blocking GET of one catalog page with libcurl.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::{FetchError, FetchOptions, PageResponse};

/// Upper bound on the connect phase; the total timeout still applies.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Performs a GET and returns status plus body.
///
/// Follows redirects. The transfer stops as soon as `abort` is set (polled
/// from curl's progress callback) or the body grows past
/// `opts.max_body_bytes`. Runs in the current thread; call from
/// `spawn_blocking` if used from async code.
pub fn fetch_blocking(
    url: &str,
    opts: &FetchOptions,
    abort: &AtomicBool,
) -> Result<PageResponse, FetchError> {
    let limit = opts.max_body_bytes;
    let mut body: Vec<u8> = Vec::new();
    let mut too_large = false;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirects)?;
    easy.connect_timeout(opts.timeout.min(MAX_CONNECT_TIMEOUT))?;
    easy.timeout(opts.timeout)?;
    easy.useragent(&opts.user_agent)?;
    easy.progress(true)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: text/html")?;
    easy.http_headers(list)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if body.len() + data.len() > limit {
                too_large = true;
                return Ok(0); // abort transfer
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if e.is_aborted_by_callback() || abort.load(Ordering::Relaxed) {
            return Err(FetchError::Aborted);
        }
        if e.is_write_error() && too_large {
            return Err(FetchError::BodyTooLarge { limit });
        }
        return Err(FetchError::Curl(e));
    }

    let status = easy.response_code()?;
    Ok(PageResponse {
        status,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
