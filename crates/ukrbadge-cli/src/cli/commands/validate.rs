//! `ukrbadge validate` – batch-resolve a title list and summarize.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;
use ukrbadge_core::batch::{resolve_batch, BatchReport};
use ukrbadge_core::config::BadgeConfig;
use ukrbadge_core::Resolver;

use super::resolve::display_url;

pub async fn run_validate(
    cfg: &BadgeConfig,
    file: Option<&Path>,
    delay_ms: Option<u64>,
    extra: Vec<String>,
) -> Result<()> {
    let mut titles = match file {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("read title list: {}", path.display()))?;
            parse_title_list(&data)
        }
        None => Vec::new(),
    };
    titles.extend(extra);
    if titles.is_empty() {
        bail!("no titles to validate (pass titles or --file)");
    }

    let delay = delay_ms.map(Duration::from_millis).unwrap_or_else(|| cfg.batch.delay());
    let resolver = Resolver::from_config(cfg)?;
    let report = resolve_batch(&resolver, &titles, delay).await;
    print_report(&report);
    Ok(())
}

/// One title per line; blank lines and `#` comments are skipped.
pub(crate) fn parse_title_list(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn print_report(report: &BatchReport) {
    println!("{:<10} {:<40} {}", "STATUS", "TITLE", "URL");
    for entry in &report.entries {
        println!(
            "{:<10} {:<40} {}",
            entry.result.status(),
            entry.title,
            display_url(&entry.result)
        );
    }
    println!();
    println!(
        "{} titles: {} official, {} community, {} not found",
        report.total(),
        report.official,
        report.community,
        report.not_found
    );
}
