use serde::Serialize;

use super::{fetch_attempt_logs, fetch_puzzles, sorted_puzzle_dates, DrillError};
use crate::scoring::selector::tie_buckets;
use crate::scoring::{clue_window_stats, puzzle_weekly_accuracy, wilson_lower_bound, WindowStats};
use crate::store::ClueStore;
use crate::types::{AttemptLog, AttemptTally, ClueRecord, Direction};

/// Wilson scores closer than this share a tier in the performance report.
pub const PERFORMANCE_TIE_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub total: u32,
    pub correct: u32,
    pub percent: Option<u32>,
    pub wilson_lower: f64,
    pub last_hour: WindowStats,
    pub last_day: WindowStats,
    pub last_week: WindowStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
    pub clue_id: String,
    pub text: String,
    pub answer: Option<String>,
    pub pattern: Option<String>,
    pub number: u32,
    pub direction: Direction,
    pub puzzle_date: String,
    /// Near-tie group index; entries in the same tier have practically equal
    /// mastery.
    pub tier: usize,
    pub stats: PerformanceStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleQuizSummary {
    pub date: String,
    pub total: usize,
    pub complete: usize,
    pub incomplete: usize,
    pub marked_complete: bool,
    pub weekly_quiz_stats: WindowStats,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn performance_entry(date: &str, clue: &ClueRecord, attempts: &AttemptLog, now: i64) -> PerformanceEntry {
    let tally = AttemptTally::from_attempts(attempts);
    let wilson = wilson_lower_bound(tally.correct(), tally.total());
    let windows = clue_window_stats(attempts, now);

    PerformanceEntry {
        clue_id: clue.clue_id(),
        text: clue.text.clone(),
        answer: clue.answer.clone(),
        pattern: clue.pattern.clone(),
        number: clue.number,
        direction: clue.direction,
        puzzle_date: date.to_string(),
        tier: 0,
        stats: PerformanceStats {
            total: windows.lifetime.total,
            correct: windows.lifetime.correct,
            percent: windows.lifetime.percent,
            wilson_lower: round_to(wilson, 3),
            last_hour: windows.last_hour,
            last_day: windows.last_day,
            last_week: windows.last_week,
        },
    }
}

/// Every drillable clue with its stats, weakest first. Clues never attempted
/// lead; the rest follow by the reported (3-decimal) Wilson bound, keeping
/// puzzle order among equal scores.
pub async fn get_performance_report(
    store: &dyn ClueStore,
    now: i64,
    fetch_concurrency: usize,
) -> Result<Vec<PerformanceEntry>, DrillError> {
    let dates = sorted_puzzle_dates(store).await?;
    let puzzles = fetch_puzzles(store, &dates, fetch_concurrency).await?;

    let clues: Vec<(String, ClueRecord)> = puzzles
        .into_iter()
        .filter_map(|(date, record)| record.map(|r| (date, r.clues)))
        .flat_map(|(date, clues)| {
            clues
                .into_iter()
                .filter(ClueRecord::is_drillable)
                .map(move |clue| (date.clone(), clue))
        })
        .collect();

    let keys: Vec<(String, String)> = clues
        .iter()
        .map(|(date, clue)| (date.clone(), clue.clue_id()))
        .collect();
    let logs = fetch_attempt_logs(store, &keys, fetch_concurrency).await?;

    let mut entries: Vec<PerformanceEntry> = clues
        .iter()
        .zip(logs.iter())
        .map(|((date, clue), log)| performance_entry(date, clue, log, now))
        .collect();

    entries.sort_by(|a, b| {
        let a_unseen = a.stats.total == 0;
        let b_unseen = b.stats.total == 0;
        b_unseen
            .cmp(&a_unseen)
            .then_with(|| a.stats.wilson_lower.total_cmp(&b.stats.wilson_lower))
    });

    let buckets = tie_buckets(&entries, |e| e.stats.wilson_lower, PERFORMANCE_TIE_TOLERANCE);
    for (tier, bucket) in buckets.into_iter().enumerate() {
        for entry in &mut entries[bucket] {
            entry.tier = tier;
        }
    }

    Ok(entries)
}

/// Per-puzzle completion counts and weekly quiz accuracy, newest first.
pub async fn puzzle_stats(
    store: &dyn ClueStore,
    now: i64,
    fetch_concurrency: usize,
) -> Result<Vec<PuzzleQuizSummary>, DrillError> {
    let dates = sorted_puzzle_dates(store).await?;
    let puzzles = fetch_puzzles(store, &dates, fetch_concurrency).await?;

    // one fan-out over every clue of every puzzle
    let keys: Vec<(String, String)> = puzzles
        .iter()
        .filter_map(|(date, record)| record.as_ref().map(|r| (date, r)))
        .flat_map(|(date, record)| {
            record
                .clues
                .iter()
                .map(move |clue| (date.clone(), clue.clue_id()))
        })
        .collect();
    let logs = fetch_attempt_logs(store, &keys, fetch_concurrency).await?;
    let mut remaining = logs.as_slice();

    let mut summaries = Vec::with_capacity(puzzles.len());
    for (date, record) in puzzles {
        let Some(record) = record else {
            summaries.push(PuzzleQuizSummary {
                date,
                total: 0,
                complete: 0,
                incomplete: 0,
                marked_complete: false,
                weekly_quiz_stats: WindowStats::empty(),
            });
            continue;
        };

        let (puzzle_logs, rest) = remaining.split_at(record.clues.len());
        remaining = rest;

        let complete = record.clues.iter().filter(|c| c.is_completed()).count();
        let weekly = puzzle_weekly_accuracy(puzzle_logs.iter().map(|log| log.as_slice()), now);

        summaries.push(PuzzleQuizSummary {
            total: record.clues.len(),
            complete,
            incomplete: record.clues.len() - complete,
            marked_complete: record.marked_complete,
            weekly_quiz_stats: weekly,
            date,
        });
    }

    summaries.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(summaries)
}
