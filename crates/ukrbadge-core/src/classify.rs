//! Page classification by marker substrings.
//!
//! The catalog has no API; entry pages are recognized by CSS class names that
//! appear in their markup. A community localization page carries an
//! installation-instruction block, which is checked before the generic
//! "this is an entry page" markers.

use serde::{Deserialize, Serialize};

use crate::types::StatusTag;

/// Marker substrings (optional `[markers]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Present only on community localization pages.
    pub community: Vec<String>,
    /// Present on any catalog entry page.
    pub official: Vec<String>,
    /// Soft-404 pages served with HTTP 200.
    pub not_found: Vec<String>,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            community: vec!["item__instruction-main".to_string()],
            official: vec![
                "html-product-details-page".to_string(),
                "game-page".to_string(),
                "item__title".to_string(),
                "product-essential".to_string(),
            ],
            not_found: vec!["page-not-found".to_string()],
        }
    }
}

fn contains_any(html: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| !m.is_empty() && html.contains(m.as_str()))
}

/// Classifies a page body. Community markers take precedence over official ones.
pub fn classify(html: &str, markers: &Markers) -> StatusTag {
    if contains_any(html, &markers.community) {
        StatusTag::Community
    } else if contains_any(html, &markers.official) {
        StatusTag::Official
    } else {
        StatusTag::None
    }
}

/// True if the body is the catalog's "page not found" page.
pub fn is_not_found(html: &str, markers: &Markers) -> bool {
    contains_any(html, &markers.not_found)
}

/// True if the body looks like a real entry page (any status marker, no not-found marker).
pub fn page_exists(html: &str, markers: &Markers) -> bool {
    !is_not_found(html, markers) && classify(html, markers) != StatusTag::None
}
