//! Value types shared by the resolver components.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Localization status of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusTag {
    /// No catalog entry (or none we could confirm).
    #[default]
    None,
    /// The catalog lists an official localization.
    Official,
    /// The catalog hosts a community localization with install instructions.
    Community,
}

impl StatusTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTag::None => "NONE",
            StatusTag::Official => "OFFICIAL",
            StatusTag::Community => "COMMUNITY",
        }
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one resolution. `url` is empty iff `status` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LookupResult {
    status: StatusTag,
    url: String,
}

impl LookupResult {
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a result; collapses to NONE when `status` is NONE or `url` is empty.
    pub fn found(status: StatusTag, url: impl Into<String>) -> Self {
        let url = url.into();
        if status == StatusTag::None || url.is_empty() {
            return Self::none();
        }
        Self { status, url }
    }

    pub fn status(&self) -> StatusTag {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_found(&self) -> bool {
        self.status != StatusTag::None
    }
}

/// A (title, link) pair scraped from a search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    /// Relative (`/hades`) or absolute link to the entry page.
    pub link: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}
