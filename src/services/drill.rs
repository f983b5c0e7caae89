use serde::Serialize;

use super::{fetch_attempt_logs, fetch_puzzles, require_non_empty, sorted_puzzle_dates, DrillError, DEFAULT_FETCH_CONCURRENCY};
use crate::scoring::{self, clue_window_stats, ClueWindowStats, RandomSource};
use crate::store::ClueStore;
use crate::types::{AttemptRecord, ClueRecord, Direction, ScoredClue};

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, Copy)]
pub struct DrillOptions {
    /// Clues of puzzles the learner marked complete are skipped unless set.
    pub include_marked_complete: bool,
    pub fetch_concurrency: usize,
}

impl Default for DrillOptions {
    fn default() -> Self {
        Self {
            include_marked_complete: false,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueView {
    pub clue_id: String,
    pub text: String,
    pub pattern: Option<String>,
    pub answer: Option<String>,
    pub number: u32,
    pub direction: Direction,
    pub puzzle_date: String,
}

impl ClueView {
    pub fn new(clue: &ClueRecord, puzzle_date: &str) -> Self {
        Self {
            clue_id: clue.clue_id(),
            text: clue.text.clone(),
            pattern: clue.pattern.clone(),
            answer: clue.answer.clone(),
            number: clue.number,
            direction: clue.direction,
            puzzle_date: puzzle_date.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacedRepetition {
    pub priority: f64,
    pub min_interval_ms: f64,
    pub min_interval_minutes: i64,
    pub time_since_last_ms: Option<i64>,
    pub time_since_last_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextClue {
    pub clue: ClueView,
    pub total_completed: usize,
    pub wilson_lower: f64,
    pub attempts: u32,
    pub correct: u32,
    pub spaced_repetition: SpacedRepetition,
}

impl NextClue {
    fn from_scored(scored: &ScoredClue, total_completed: usize) -> Self {
        Self {
            clue: ClueView::new(&scored.clue, &scored.puzzle_date),
            total_completed,
            wilson_lower: scored.wilson_lower,
            attempts: scored.total_attempts,
            correct: scored.correct_attempts,
            spaced_repetition: SpacedRepetition {
                priority: scored.priority,
                min_interval_ms: scored.min_interval,
                min_interval_minutes: (scored.min_interval / MS_PER_MINUTE).round() as i64,
                time_since_last_ms: scored.time_since_last_attempt,
                time_since_last_minutes: scored
                    .time_since_last_attempt
                    .map(|ms| (ms as f64 / MS_PER_MINUTE).round() as i64),
            },
        }
    }
}

/// Completed, non-ignored clues across all stored puzzles, paired with their
/// puzzle date. Fails with `NoPuzzles` when nothing has been saved yet.
pub async fn collect_drillable_clues(
    store: &dyn ClueStore,
    options: DrillOptions,
) -> Result<Vec<(String, ClueRecord)>, DrillError> {
    let dates = sorted_puzzle_dates(store).await?;
    if dates.is_empty() {
        return Err(DrillError::NoPuzzles);
    }

    let puzzles = fetch_puzzles(store, &dates, options.fetch_concurrency).await?;

    let mut clues = Vec::new();
    for (date, record) in puzzles {
        let Some(record) = record else {
            tracing::debug!(puzzle_date = %date, "puzzle date registered without record");
            continue;
        };
        if record.marked_complete && !options.include_marked_complete {
            continue;
        }
        clues.extend(
            record
                .clues
                .into_iter()
                .filter(ClueRecord::is_drillable)
                .map(|clue| (date.clone(), clue)),
        );
    }
    Ok(clues)
}

pub async fn score_clues(
    store: &dyn ClueStore,
    clues: Vec<(String, ClueRecord)>,
    now: i64,
    fetch_concurrency: usize,
) -> Result<Vec<ScoredClue>, DrillError> {
    let keys: Vec<(String, String)> = clues
        .iter()
        .map(|(date, clue)| (date.clone(), clue.clue_id()))
        .collect();
    let logs = fetch_attempt_logs(store, &keys, fetch_concurrency).await?;

    Ok(clues
        .into_iter()
        .zip(logs)
        .map(|((date, clue), log)| scoring::score_clue(clue, date, &log, now))
        .collect())
}

pub async fn get_next_clue(
    store: &dyn ClueStore,
    rng: &mut dyn RandomSource,
    options: DrillOptions,
    now: i64,
) -> Result<NextClue, DrillError> {
    let clues = collect_drillable_clues(store, options).await?;
    if clues.is_empty() {
        return Err(DrillError::NoEligibleClues);
    }

    let scored = score_clues(store, clues, now, options.fetch_concurrency).await?;
    let total_completed = scored.len();
    let selection = scoring::select_next(scored, rng)?;

    tracing::info!(
        clue_id = %selection.scored.clue_id(),
        puzzle_date = %selection.scored.puzzle_date,
        rank = selection.rank,
        candidates = selection.candidate_count,
        "next clue chosen"
    );

    Ok(NextClue::from_scored(&selection.scored, total_completed))
}

pub async fn get_clue_stats(
    store: &dyn ClueStore,
    clue_id: &str,
    puzzle_date: &str,
    now: i64,
) -> Result<ClueWindowStats, DrillError> {
    require_non_empty(clue_id, "clueId")?;
    require_non_empty(puzzle_date, "puzzleDate")?;

    let attempts = store.get_attempts(puzzle_date, clue_id).await?;
    Ok(clue_window_stats(&attempts, now))
}

/// Appends one attempt and returns the refreshed window stats for the clue.
pub async fn record_attempt(
    store: &dyn ClueStore,
    clue_id: &str,
    puzzle_date: &str,
    correct: bool,
    now: i64,
) -> Result<ClueWindowStats, DrillError> {
    require_non_empty(clue_id, "clueId")?;
    require_non_empty(puzzle_date, "puzzleDate")?;

    let len = store
        .append_attempt(puzzle_date, clue_id, AttemptRecord::new(now, correct))
        .await?;
    tracing::debug!(clue_id, puzzle_date, correct, log_len = len, "attempt recorded");

    let attempts = store.get_attempts(puzzle_date, clue_id).await?;
    Ok(clue_window_stats(&attempts, now))
}
