//! Candidate scoring for search fallback.
//!
//! Lower cost is better. An exact (case-insensitive) title match ends the scan;
//! a candidate that starts with the target beats anything matched only by
//! length similarity.

use serde::{Deserialize, Serialize};

use crate::types::Candidate;

/// Cost of an exact case-insensitive match.
pub const EXACT_COST: usize = 0;
/// Cost of a candidate whose title starts with the target.
pub const PREFIX_COST: usize = 1;
/// Fixed penalty added to the length difference for any other candidate.
pub const LENGTH_PENALTY: usize = 5;

/// Scoring parameters (optional `[scoring]` section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Best candidates costing more than this are rejected.
    pub acceptance_threshold: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 15,
        }
    }
}

/// Winning candidate with its position in the extraction order and its cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    pub candidate: Candidate,
    pub index: usize,
    pub cost: usize,
}

/// Why no candidate was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoCandidates,
    /// The best candidate cost more than the threshold.
    AboveThreshold { best_cost: usize },
}

/// Cost of one candidate title against the target title.
pub fn cost(target: &str, candidate_title: &str) -> usize {
    let target = target.trim().to_lowercase();
    let candidate = candidate_title.trim().to_lowercase();
    if candidate == target {
        return EXACT_COST;
    }
    if candidate.starts_with(&target) {
        return PREFIX_COST;
    }
    let target_len = target.chars().count();
    let candidate_len = candidate.chars().count();
    target_len.abs_diff(candidate_len) + LENGTH_PENALTY
}

/// Picks the lowest-cost candidate; the first seen wins ties.
pub fn select(target: &str, candidates: &[Candidate], threshold: usize) -> Result<Scored, Rejection> {
    let mut best: Option<(usize, usize)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let c = cost(target, &candidate.title);
        tracing::trace!(title = %candidate.title, link = %candidate.link, cost = c, "scored candidate");
        if best.map_or(true, |(_, best_cost)| c < best_cost) {
            best = Some((index, c));
        }
        if c == EXACT_COST {
            break;
        }
    }

    let (index, best_cost) = best.ok_or(Rejection::NoCandidates)?;
    if best_cost > threshold {
        return Err(Rejection::AboveThreshold { best_cost });
    }
    Ok(Scored {
        candidate: candidates[index].clone(),
        index,
        cost: best_cost,
    })
}

/// Returns the best candidate, or `None` if there is no confident match.
pub fn score(target: &str, candidates: &[Candidate], threshold: usize) -> Option<Candidate> {
    select(target, candidates, threshold).ok().map(|s| s.candidate)
}
