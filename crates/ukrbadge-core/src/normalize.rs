//! Title normalization: display title → catalog slug.
//!
//! The catalog addresses entries as `/{slug}` where the slug is the lowercased
//! title with punctuation runs collapsed to single hyphens. Steam shortcut
//! decorations and trailing version markers are removed first so that
//! `"Half-Life 2 (Shortcut)"` and `"Half-Life 2 v1.0.3"` both land on
//! `half-life-2`.

use regex::Regex;
use std::sync::OnceLock;

/// Characters dropped without leaving a hyphen (`Baldur's` → `baldurs`).
const APOSTROPHES: [char; 4] = ['\'', '\u{2018}', '\u{2019}', '\u{02BC}'];

fn shortcut_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s*\((?:shortcut|non-steam|app|game)\)\s*$").expect("valid regex")
    })
}

// Requires whitespace before the `v` so an existing slug such as `game-v2`
// is left alone.
fn version_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+v\d+(?:\.\d+)*\s*$").expect("valid regex"))
}

/// Normalizes a title into a slug matching `[a-z0-9]+(-[a-z0-9]+)*`.
///
/// Returns an empty string when nothing alphanumeric survives; callers treat
/// that as "not in the catalog" without touching the network.
pub fn normalize(title: &str) -> String {
    let stripped = shortcut_suffix().replace(title, "");
    let stripped = version_suffix().replace(&stripped, "");
    let lowered = stripped.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for ch in lowered.chars() {
        if APOSTROPHES.contains(&ch) {
            continue;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
