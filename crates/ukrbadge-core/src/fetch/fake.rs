//! In-memory fetcher for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{FetchError, PageFetcher, PageResponse};

pub(crate) enum Canned {
    Page(u32, String),
    Fail,
}

/// Serves canned responses by exact URL; unknown URLs get a 404.
#[derive(Default)]
pub(crate) struct FakeFetcher {
    pages: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, status: u32, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), Canned::Page(status, body.to_string()));
        self
    }

    pub(crate) fn failing(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), Canned::Fail);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl PageFetcher for FakeFetcher {
    async fn get(&self, url: &str) -> Result<PageResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Canned::Page(status, body)) => Ok(PageResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Canned::Fail) => Err(FetchError::Join("simulated network failure".to_string())),
            None => Ok(PageResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}
