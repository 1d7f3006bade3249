//! `ukrbadge slug <title>` – print the canonical slug.

use ukrbadge_core::normalize;

pub fn run_slug(title: &str) {
    println!("{}", normalize(title));
}
