use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::DrillError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Across => "across",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted answer. Logs are append-only; records are never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub correct: bool,
}

impl AttemptRecord {
    pub fn new(timestamp: i64, correct: bool) -> Self {
        Self { timestamp, correct }
    }
}

pub type AttemptLog = Vec<AttemptRecord>;

/// `correct <= total` is enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttemptTally {
    correct: u32,
    total: u32,
}

impl AttemptTally {
    pub fn new(correct: u32, total: u32) -> Result<Self, DrillError> {
        if correct > total {
            return Err(DrillError::InvalidInput(format!(
                "correct attempts ({correct}) exceed total attempts ({total})"
            )));
        }
        Ok(Self { correct, total })
    }

    pub fn from_attempts<'a, I>(attempts: I) -> Self
    where
        I: IntoIterator<Item = &'a AttemptRecord>,
    {
        let (correct, total) = attempts
            .into_iter()
            .fold((0u32, 0u32), |(correct, total), attempt| {
                (correct + u32::from(attempt.correct), total + 1)
            });
        // both counts come from the same log, so this never rejects
        Self::new(correct, total).unwrap_or_default()
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueRecord {
    pub number: u32,
    pub direction: Direction,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub ignored: bool,
}

impl ClueRecord {
    pub fn new(number: u32, direction: Direction, text: impl Into<String>) -> Self {
        Self {
            number,
            direction,
            text: text.into(),
            pattern: None,
            answer: None,
            ignored: false,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn clue_id(&self) -> String {
        clue_id(self.direction, self.number)
    }

    pub fn pattern_len(&self) -> Option<usize> {
        self.pattern.as_deref().map(|p| p.chars().count())
    }

    /// Answer is non-empty and exactly as long as the grid pattern.
    pub fn is_completed(&self) -> bool {
        match (self.answer.as_deref(), self.pattern_len()) {
            (Some(answer), Some(len)) => !answer.is_empty() && answer.chars().count() == len,
            _ => false,
        }
    }

    pub fn is_drillable(&self) -> bool {
        !self.ignored && self.is_completed()
    }
}

pub fn clue_id(direction: Direction, number: u32) -> String {
    format!("{}-{}", direction.as_str(), number)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRecord {
    pub puzzle_date: String,
    pub clues: Vec<ClueRecord>,
    #[serde(default)]
    pub marked_complete: bool,
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PuzzleRecord {
    pub fn new(puzzle_date: impl Into<String>, clues: Vec<ClueRecord>, saved_at: DateTime<Utc>) -> Self {
        Self {
            puzzle_date: puzzle_date.into(),
            clues,
            marked_complete: false,
            saved_at,
            updated_at: None,
        }
    }

    pub fn find_clue(&self, clue_id: &str) -> Option<usize> {
        self.clues.iter().position(|c| c.clue_id() == clue_id)
    }
}

/// A clue paired with its scoring state at one instant. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredClue {
    pub clue: ClueRecord,
    pub puzzle_date: String,
    pub wilson_lower: f64,
    pub total_attempts: u32,
    pub correct_attempts: u32,
    pub last_attempt_time: Option<i64>,
    /// Milliseconds.
    pub min_interval: f64,
    pub priority: f64,
    pub time_since_last_attempt: Option<i64>,
}

impl ScoredClue {
    pub fn clue_id(&self) -> String {
        self.clue.clue_id()
    }
}
