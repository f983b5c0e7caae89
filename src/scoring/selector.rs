//! Next-clue selection: rank by priority, shuffle near-ties, then draw from
//! the most urgent few with linearly decreasing weights.

use std::ops::Range;

use crate::scoring::random::RandomSource;
use crate::services::DrillError;
use crate::types::ScoredClue;

/// Priorities closer than this are treated as tied when selecting.
pub const SELECTION_TIE_TOLERANCE: f64 = 0.1;
pub const MAX_CANDIDATES: usize = 5;

#[derive(Debug, Clone)]
pub struct Selection {
    pub scored: ScoredClue,
    /// Position of the chosen clue in the ranked candidate list.
    pub rank: usize,
    pub candidate_count: usize,
}

/// Splits an already-sorted slice into contiguous runs whose neighbours are
/// closer than `tolerance`.
pub fn tie_buckets<T, F>(items: &[T], key: F, tolerance: f64) -> Vec<Range<usize>>
where
    F: Fn(&T) -> f64,
{
    let mut buckets = Vec::new();
    if items.is_empty() {
        return buckets;
    }

    let mut start = 0;
    for i in 1..items.len() {
        if (key(&items[i]) - key(&items[i - 1])).abs() >= tolerance {
            buckets.push(start..i);
            start = i;
        }
    }
    buckets.push(start..items.len());
    buckets
}

/// Fisher-Yates inside each bucket; elements never cross bucket bounds.
pub fn shuffle_buckets<T>(items: &mut [T], buckets: &[Range<usize>], rng: &mut dyn RandomSource) {
    for bucket in buckets {
        let slice = &mut items[bucket.clone()];
        for i in (1..slice.len()).rev() {
            let j = rng.below(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Stable sort by priority followed by a shuffle of each near-tie bucket.
pub fn rank_by_priority(mut scored: Vec<ScoredClue>, rng: &mut dyn RandomSource) -> Vec<ScoredClue> {
    scored.sort_by(|a, b| a.priority.total_cmp(&b.priority));
    let buckets = tie_buckets(&scored, |s| s.priority, SELECTION_TIE_TOLERANCE);
    shuffle_buckets(&mut scored, &buckets, rng);
    scored
}

/// Index drawn with weights `k, k-1, ..., 1`.
pub fn weighted_index(candidate_count: usize, rng: &mut dyn RandomSource) -> usize {
    if candidate_count <= 1 {
        return 0;
    }

    let total_weight = (candidate_count * (candidate_count + 1) / 2) as f64;
    let target = rng.next_f64() * total_weight;

    let mut cumulative = 0.0;
    for i in 0..candidate_count {
        cumulative += (candidate_count - i) as f64;
        if target < cumulative {
            return i;
        }
    }
    candidate_count - 1
}

pub fn select_next(
    scored: Vec<ScoredClue>,
    rng: &mut dyn RandomSource,
) -> Result<Selection, DrillError> {
    if scored.is_empty() {
        return Err(DrillError::NoEligibleClues);
    }

    let mut ranked = rank_by_priority(scored, rng);
    let candidate_count = ranked.len().min(MAX_CANDIDATES);
    let rank = weighted_index(candidate_count, rng);

    tracing::debug!(
        eligible = ranked.len(),
        candidate_count,
        rank,
        priority = ranked[rank].priority,
        "selected next clue"
    );

    Ok(Selection {
        scored: ranked.swap_remove(rank),
        rank,
        candidate_count,
    })
}
