//! Sequential resolution of a title list with a pause between titles.

use serde::Serialize;
use std::time::Duration;

use crate::fetch::PageFetcher;
use crate::resolver::Resolver;
use crate::types::{LookupResult, StatusTag};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub title: String,
    pub result: LookupResult,
}

/// Per-title results in input order, plus tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub official: usize,
    pub community: usize,
    pub not_found: usize,
}

impl BatchReport {
    fn record(&mut self, title: &str, result: LookupResult) {
        match result.status() {
            StatusTag::Official => self.official += 1,
            StatusTag::Community => self.community += 1,
            StatusTag::None => self.not_found += 1,
        }
        self.entries.push(BatchEntry {
            title: title.to_string(),
            result,
        });
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn found(&self) -> usize {
        self.official + self.community
    }
}

/// Resolves `titles` one at a time, sleeping `delay` between them (not after the last).
pub async fn resolve_batch<F, S>(resolver: &Resolver<F>, titles: &[S], delay: Duration) -> BatchReport
where
    F: PageFetcher,
    S: AsRef<str>,
{
    let mut report = BatchReport::default();
    for (i, title) in titles.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let title = title.as_ref();
        let result = resolver.resolve(title).await;
        tracing::debug!(index = i, %title, status = %result.status(), "batch entry");
        report.record(title, result);
    }
    tracing::info!(
        total = report.total(),
        official = report.official,
        community = report.community,
        not_found = report.not_found,
        "batch finished"
    );
    report
}
