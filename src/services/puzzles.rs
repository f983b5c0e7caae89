use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{fetch_attempt_logs, fetch_puzzles, require_non_empty, sorted_puzzle_dates, DrillError};
use crate::store::ClueStore;
use crate::types::{AttemptTally, ClueRecord, PuzzleRecord};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSummary {
    pub date: String,
    pub total: usize,
    pub incomplete: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleList {
    pub dates: Vec<String>,
    pub puzzles: Vec<PuzzleSummary>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizStats {
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueWithStats {
    #[serde(flatten)]
    pub clue: ClueRecord,
    pub quiz_stats: Option<QuizStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleDetail {
    pub puzzle_date: String,
    pub clues: Vec<ClueWithStats>,
    pub marked_complete: bool,
    pub saved_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteClue {
    #[serde(flatten)]
    pub clue: ClueRecord,
    pub puzzle_date: String,
}

/// Partial edit of a stored clue; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueUpdate {
    pub text: Option<String>,
    pub pattern: Option<String>,
    pub answer: Option<String>,
    pub ignored: Option<bool>,
}

impl ClueUpdate {
    fn is_empty(&self) -> bool {
        self.text.is_none() && self.pattern.is_none() && self.answer.is_none() && self.ignored.is_none()
    }
}

async fn load_puzzle(store: &dyn ClueStore, puzzle_date: &str) -> Result<PuzzleRecord, DrillError> {
    require_non_empty(puzzle_date, "puzzleDate")?;
    store
        .get_puzzle(puzzle_date)
        .await?
        .ok_or_else(|| DrillError::NotFound("Puzzle not found".to_string()))
}

/// Stores a freshly scraped puzzle, replacing any earlier save for the date.
pub async fn save_puzzle(
    store: &dyn ClueStore,
    puzzle_date: &str,
    clues: Vec<ClueRecord>,
    now: DateTime<Utc>,
) -> Result<PuzzleRecord, DrillError> {
    require_non_empty(puzzle_date, "puzzleDate")?;

    let record = PuzzleRecord::new(puzzle_date.trim(), clues, now);
    store.put_puzzle(&record).await?;
    tracing::info!(puzzle_date = %record.puzzle_date, clues = record.clues.len(), "puzzle saved");
    Ok(record)
}

pub async fn list_puzzles(
    store: &dyn ClueStore,
    fetch_concurrency: usize,
) -> Result<PuzzleList, DrillError> {
    let mut dates = sorted_puzzle_dates(store).await?;
    dates.reverse();

    let puzzles = fetch_puzzles(store, &dates, fetch_concurrency)
        .await?
        .into_iter()
        .map(|(date, record)| match record {
            Some(record) => PuzzleSummary {
                total: record.clues.len(),
                incomplete: record.clues.iter().filter(|c| !c.is_completed()).count(),
                date,
            },
            None => PuzzleSummary {
                date,
                total: 0,
                incomplete: 0,
            },
        })
        .collect();

    Ok(PuzzleList { dates, puzzles })
}

/// The stored puzzle with lifetime quiz stats on each completed clue that has
/// been attempted at least once.
pub async fn get_puzzle_with_stats(
    store: &dyn ClueStore,
    puzzle_date: &str,
    fetch_concurrency: usize,
) -> Result<PuzzleDetail, DrillError> {
    let record = load_puzzle(store, puzzle_date).await?;

    let completed: Vec<usize> = record
        .clues
        .iter()
        .enumerate()
        .filter(|(_, clue)| clue.is_completed())
        .map(|(i, _)| i)
        .collect();
    let keys: Vec<(String, String)> = completed
        .iter()
        .map(|&i| (record.puzzle_date.clone(), record.clues[i].clue_id()))
        .collect();
    let logs = fetch_attempt_logs(store, &keys, fetch_concurrency).await?;

    let mut stats = vec![None; record.clues.len()];
    for (&i, log) in completed.iter().zip(logs.iter()) {
        let tally = AttemptTally::from_attempts(log);
        if tally.total() > 0 {
            stats[i] = Some(QuizStats {
                correct: tally.correct(),
                total: tally.total(),
            });
        }
    }

    Ok(PuzzleDetail {
        clues: record
            .clues
            .into_iter()
            .zip(stats)
            .map(|(clue, quiz_stats)| ClueWithStats { clue, quiz_stats })
            .collect(),
        puzzle_date: record.puzzle_date,
        marked_complete: record.marked_complete,
        saved_at: record.saved_at,
        updated_at: record.updated_at,
    })
}

pub async fn update_clue(
    store: &dyn ClueStore,
    puzzle_date: &str,
    clue_id: &str,
    updates: ClueUpdate,
    now: DateTime<Utc>,
) -> Result<ClueRecord, DrillError> {
    require_non_empty(clue_id, "clueId")?;
    if updates.is_empty() {
        return Err(DrillError::InvalidInput("Missing updates".to_string()));
    }

    let mut record = load_puzzle(store, puzzle_date).await?;
    let index = record
        .find_clue(clue_id)
        .ok_or_else(|| DrillError::NotFound("Clue not found".to_string()))?;

    let clue = &mut record.clues[index];
    if let Some(pattern) = updates.pattern {
        clue.pattern = Some(pattern);
    }
    if let Some(answer) = updates.answer {
        if let Some(expected) = clue.pattern_len() {
            if !answer.is_empty() && answer.chars().count() != expected {
                return Err(DrillError::InvalidInput(format!(
                    "Answer must be {expected} characters"
                )));
            }
        }
        clue.answer = Some(answer);
    }
    if let Some(text) = updates.text {
        clue.text = text;
    }
    if let Some(ignored) = updates.ignored {
        clue.ignored = ignored;
    }
    let updated = clue.clone();

    record.updated_at = Some(now);
    store.put_puzzle(&record).await?;
    tracing::info!(puzzle_date, clue_id, "clue updated");
    Ok(updated)
}

/// Removing a clue leaves its attempt log in place.
pub async fn delete_clue(
    store: &dyn ClueStore,
    puzzle_date: &str,
    clue_id: &str,
    now: DateTime<Utc>,
) -> Result<(), DrillError> {
    require_non_empty(clue_id, "clueId")?;
    let mut record = load_puzzle(store, puzzle_date).await?;

    let before = record.clues.len();
    record.clues.retain(|c| c.clue_id() != clue_id);
    record.updated_at = Some(now);
    store.put_puzzle(&record).await?;

    tracing::info!(puzzle_date, clue_id, removed = before - record.clues.len(), "clue deleted");
    Ok(())
}

pub async fn set_marked_complete(
    store: &dyn ClueStore,
    puzzle_date: &str,
    marked_complete: bool,
    now: DateTime<Utc>,
) -> Result<bool, DrillError> {
    let mut record = load_puzzle(store, puzzle_date).await?;
    record.marked_complete = marked_complete;
    record.updated_at = Some(now);
    store.put_puzzle(&record).await?;
    Ok(marked_complete)
}

/// Non-ignored clues still missing a full answer, newest puzzle first, then
/// by direction and number.
pub async fn list_incomplete_clues(
    store: &dyn ClueStore,
    fetch_concurrency: usize,
) -> Result<Vec<IncompleteClue>, DrillError> {
    let dates = sorted_puzzle_dates(store).await?;
    let puzzles = fetch_puzzles(store, &dates, fetch_concurrency).await?;

    let mut clues: Vec<IncompleteClue> = puzzles
        .into_iter()
        .filter_map(|(date, record)| record.map(|r| (date, r.clues)))
        .flat_map(|(date, clues)| {
            clues
                .into_iter()
                .filter(|c| !c.ignored && !c.is_completed())
                .map(move |clue| IncompleteClue {
                    clue,
                    puzzle_date: date.clone(),
                })
        })
        .collect();

    clues.sort_by(|a, b| {
        b.puzzle_date
            .cmp(&a.puzzle_date)
            .then_with(|| a.clue.direction.cmp(&b.clue.direction))
            .then_with(|| a.clue.number.cmp(&b.clue.number))
    });
    Ok(clues)
}
