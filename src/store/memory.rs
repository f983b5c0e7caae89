use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{ClueStore, StoreError};
use crate::types::{AttemptLog, AttemptRecord, PuzzleRecord};

#[derive(Debug, Default)]
struct Inner {
    dates: BTreeSet<String>,
    puzzles: HashMap<String, PuzzleRecord>,
    attempts: HashMap<(String, String), AttemptLog>,
}

/// Process-local store. Used in tests and when no Redis is configured.
#[derive(Debug, Default)]
pub struct MemoryClueStore {
    inner: RwLock<Inner>,
}

impl MemoryClueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a date without a puzzle record behind it.
    pub fn register_date(&self, puzzle_date: &str) {
        self.inner.write().dates.insert(puzzle_date.to_string());
    }

    pub fn seed_attempts(&self, puzzle_date: &str, clue_id: &str, attempts: AttemptLog) {
        self.inner
            .write()
            .attempts
            .insert((puzzle_date.to_string(), clue_id.to_string()), attempts);
    }
}

#[async_trait]
impl ClueStore for MemoryClueStore {
    async fn list_puzzle_dates(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.inner.read().dates.iter().cloned().collect())
    }

    async fn get_puzzle(&self, puzzle_date: &str) -> Result<Option<PuzzleRecord>, StoreError> {
        Ok(self.inner.read().puzzles.get(puzzle_date).cloned())
    }

    async fn put_puzzle(&self, record: &PuzzleRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.dates.insert(record.puzzle_date.clone());
        inner
            .puzzles
            .insert(record.puzzle_date.clone(), record.clone());
        Ok(())
    }

    async fn get_attempts(&self, puzzle_date: &str, clue_id: &str) -> Result<AttemptLog, StoreError> {
        let key = (puzzle_date.to_string(), clue_id.to_string());
        Ok(self.inner.read().attempts.get(&key).cloned().unwrap_or_default())
    }

    async fn append_attempt(
        &self,
        puzzle_date: &str,
        clue_id: &str,
        attempt: AttemptRecord,
    ) -> Result<usize, StoreError> {
        let mut inner = self.inner.write();
        let log = inner
            .attempts
            .entry((puzzle_date.to_string(), clue_id.to_string()))
            .or_default();
        log.push(attempt);
        Ok(log.len())
    }

    async fn ping(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
