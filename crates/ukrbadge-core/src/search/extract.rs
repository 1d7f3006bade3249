//! Candidate extraction from the catalog's search results markup.
//!
//! Two layers. The primary pattern looks for anchors that wrap a
//! title-bearing element and yields (title, link) pairs. If that finds
//! nothing, the loose pattern takes the first link inside each result-item
//! block and derives a title from the link's last path segment.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::types::Candidate;

use super::SearchConfig;

/// Which pattern produced the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Primary,
    Loose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub candidates: Vec<Candidate>,
    pub layer: Layer,
}

/// A configured class name that cannot be turned into a CSS selector.
#[derive(Debug, Error)]
#[error("invalid {role} class {name:?}: {reason}")]
pub struct ExtractorError {
    role: &'static str,
    name: String,
    reason: String,
}

/// Compiled selectors for one `SearchConfig`.
#[derive(Debug, Clone)]
pub struct CandidateExtractor {
    anchor: Selector,
    link: Selector,
    title: Selector,
    title_class: String,
    item: Selector,
    search_path: String,
}

fn selector(role: &'static str, name: &str, css: &str) -> Result<Selector, ExtractorError> {
    let invalid = |reason: String| ExtractorError {
        role,
        name: name.to_string(),
        reason,
    };
    if name.trim().is_empty() {
        return Err(invalid("empty".to_string()));
    }
    Selector::parse(css).map_err(|e| invalid(e.to_string()))
}

/// Text content with whitespace runs (including `&nbsp;`) collapsed.
fn text_of(el: ElementRef<'_>) -> String {
    let raw = el.text().collect::<Vec<_>>().join(" ");
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl CandidateExtractor {
    pub fn new(config: &SearchConfig) -> Result<Self, ExtractorError> {
        let title_class = config.title_class.trim();
        let item_class = config.item_class.trim();
        let item_value = item_class.replace('\\', "\\\\").replace('"', "\\\"");
        Ok(Self {
            anchor: selector("anchor", "a", "a[href]")?,
            link: selector("link", "a", "[href]")?,
            title: selector("title", title_class, &format!(".{title_class}"))?,
            title_class: title_class.to_string(),
            // Substring match: result blocks often carry modifiers (`product-item-full`).
            item: selector("item", item_class, &format!("[class*=\"{item_value}\"]"))?,
            search_path: config.path.trim_end_matches('/').to_string(),
        })
    }

    /// Extracts candidates in document order, primary pattern first.
    pub fn extract(&self, html: &str) -> Extraction {
        let doc = Html::parse_document(html);
        let primary = self.extract_primary(&doc);
        if !primary.is_empty() {
            return Extraction {
                candidates: primary,
                layer: Layer::Primary,
            };
        }
        Extraction {
            candidates: self.extract_loose(&doc),
            layer: Layer::Loose,
        }
    }

    fn extract_primary(&self, doc: &Html) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = Vec::new();
        for anchor in doc.select(&self.anchor) {
            let Some(link) = anchor.value().attr("href").map(str::trim) else {
                continue;
            };
            let title = if anchor.value().classes().any(|c| c == self.title_class) {
                text_of(anchor)
            } else {
                match anchor.select(&self.title).next() {
                    Some(el) => text_of(el),
                    None => continue,
                }
            };
            if title.is_empty() {
                continue;
            }
            self.push_unique(&mut out, Candidate::new(title, link));
        }
        out
    }

    fn extract_loose(&self, doc: &Html) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = Vec::new();
        for item in doc.select(&self.item) {
            // The item element itself may carry the href (`<a class="product-item" href=...>`).
            let link = item
                .value()
                .attr("href")
                .or_else(|| {
                    item.select(&self.link)
                        .next()
                        .and_then(|el| el.value().attr("href"))
                })
                .map(str::trim);
            let Some(link) = link else {
                continue;
            };
            let title = title_from_link(link);
            if title.is_empty() {
                continue;
            }
            self.push_unique(&mut out, Candidate::new(title, link));
        }
        out
    }

    fn push_unique(&self, out: &mut Vec<Candidate>, candidate: Candidate) {
        if !self.is_entry_link(&candidate.link) {
            return;
        }
        if out.iter().any(|c| c.link == candidate.link) {
            return;
        }
        out.push(candidate);
    }

    /// Rejects in-page anchors, scripts, the site root and links back to the search page.
    fn is_entry_link(&self, link: &str) -> bool {
        if link.is_empty() || link.starts_with('#') {
            return false;
        }
        let lower = link.to_ascii_lowercase();
        if lower.starts_with("javascript:") || lower.starts_with("mailto:") {
            return false;
        }
        let path = link_path(link);
        !path.is_empty() && path != self.search_path
    }
}

/// Path of a relative or absolute link, without query, fragment or trailing slash.
fn link_path(link: &str) -> &str {
    let without_scheme = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .or_else(|| link.strip_prefix("//"));
    let path = match without_scheme {
        Some(rest) => rest.find('/').map_or("", |i| &rest[i..]),
        None => link,
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].trim_end_matches('/')
}

/// `/hollow-knight` → `hollow knight`.
fn title_from_link(link: &str) -> String {
    let path = link_path(link);
    let segment = path.rsplit('/').next().unwrap_or("");
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    decoded
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> CandidateExtractor {
        CandidateExtractor::new(&SearchConfig::default()).unwrap()
    }

    const PRIMARY_PAGE: &str = r#"
        <div class="catalog">
          <a href="/games" class="nav-link">Ігри</a>
          <a href="/hollow-knight" class="product-item product-item--grid">
            <img src="/img/hk.jpg">
            <h2 class="product-title">
              <div class="product-title-wrapper">
                Hollow Knight
              </div>
            </h2>
          </a>
          <a class="product-item" href="/hollow-knight-silksong">
            <div class="product-title">Hollow Knight: Silksong</div>
          </a>
          <a href="/hollow-knight" class="product-item">
            <div class="product-title">Hollow Knight (duplicate)</div>
          </a>
        </div>
    "#;

    #[test]
    fn primary_pattern_pairs_links_and_titles() {
        let ex = extractor().extract(PRIMARY_PAGE);
        assert_eq!(ex.layer, Layer::Primary);
        assert_eq!(
            ex.candidates,
            vec![
                Candidate::new("Hollow Knight", "/hollow-knight"),
                Candidate::new("Hollow Knight: Silksong", "/hollow-knight-silksong"),
            ]
        );
    }

    #[test]
    fn primary_pattern_title_class_on_anchor() {
        let html = r#"<li class="product-item"><a class="product-title" href="https://kuli.com.ua/baldurs-gate-3">Baldur&#39;s Gate&nbsp;3</a></li>"#;
        let ex = extractor().extract(html);
        assert_eq!(ex.layer, Layer::Primary);
        assert_eq!(
            ex.candidates,
            vec![Candidate::new("Baldur's Gate 3", "https://kuli.com.ua/baldurs-gate-3")]
        );
    }

    #[test]
    fn titles_decode_named_entities() {
        let html = r#"<a href="/pokemon-legends-arceus"><span class="product-title">Pok&eacute;mon Legends&colon; Arceus &mdash; DLC</span></a>"#;
        assert_eq!(
            extractor().extract(html).candidates,
            vec![Candidate::new("Pokémon Legends: Arceus — DLC", "/pokemon-legends-arceus")]
        );
    }

    #[test]
    fn unusable_class_names_are_rejected() {
        let cfg = SearchConfig {
            title_class: "  ".to_string(),
            ..SearchConfig::default()
        };
        let err = CandidateExtractor::new(&cfg).unwrap_err();
        assert!(err.to_string().starts_with("invalid title class"));

        let cfg = SearchConfig {
            title_class: "1bad[".to_string(),
            ..SearchConfig::default()
        };
        assert!(CandidateExtractor::new(&cfg).is_err());
    }

    #[test]
    fn title_class_must_be_whole_token() {
        // `product-title-wrapper` alone is not a title element.
        let html = r#"<a href="/hades"><span class="product-title-wrapper">Hades</span></a>"#;
        let ex = extractor().extract(html);
        assert!(ex.candidates.is_empty());
    }

    #[test]
    fn loose_pattern_when_no_titles() {
        let html = r##"
            <div class="product-item-full">
              <a href="/disco-elysium"><img alt=""></a>
            </div>
            <div class="product-item-full"><span>no link here</span></div>
            <a class="product-item" href="/metro-exodus?ref=search"></a>
            <div class="product-item"><a href="#reviews"></a></div>
        "##;
        let ex = extractor().extract(html);
        assert_eq!(ex.layer, Layer::Loose);
        assert_eq!(
            ex.candidates,
            vec![
                Candidate::new("disco elysium", "/disco-elysium"),
                Candidate::new("metro exodus", "/metro-exodus?ref=search"),
            ]
        );
    }

    #[test]
    fn unrecognized_markup_yields_nothing() {
        let ex = extractor().extract("<html><body><p>Нічого не знайдено</p></body></html>");
        assert!(ex.candidates.is_empty());
        assert_eq!(ex.layer, Layer::Loose);
    }

    #[test]
    fn search_and_root_links_are_skipped() {
        let html = r#"
            <a href="/games?query=hades&page=2" class="product-item"><b class="product-title">Next page</b></a>
            <a href="/" class="product-item"><b class="product-title">Home</b></a>
            <a href="javascript:void(0)"><b class="product-title">Filter</b></a>
            <a href="/hades"><b class="product-title">Hades</b></a>
        "#;
        let ex = extractor().extract(html);
        assert_eq!(ex.candidates, vec![Candidate::new("Hades", "/hades")]);
    }

    #[test]
    fn custom_class_names() {
        let cfg = SearchConfig {
            item_class: "card".to_string(),
            title_class: "card__name".to_string(),
            ..SearchConfig::default()
        };
        let ex = CandidateExtractor::new(&cfg).unwrap();
        let html = r#"<a class="card" href="/factorio"><p class="card__name">Factorio</p></a>"#;
        assert_eq!(
            ex.extract(html).candidates,
            vec![Candidate::new("Factorio", "/factorio")]
        );
    }

    #[test]
    fn link_paths() {
        assert_eq!(link_path("/hades/"), "/hades");
        assert_eq!(link_path("https://kuli.com.ua/games?query=x"), "/games");
        assert_eq!(link_path("https://kuli.com.ua"), "");
        assert_eq!(link_path("//kuli.com.ua/factorio#top"), "/factorio");
        assert_eq!(title_from_link("/neon-abyss"), "neon abyss");
        assert_eq!(title_from_link("https://kuli.com.ua/west_of%20dead/"), "west of dead");
    }
}
