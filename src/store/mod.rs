pub mod keys;
pub mod memory;
pub mod redis_store;

use async_trait::async_trait;

use crate::types::{AttemptLog, AttemptRecord, PuzzleRecord};

pub use self::memory::MemoryClueStore;
pub use self::redis_store::RedisClueStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
    #[error("malformed record: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Key-value persistence for puzzles and per-clue attempt logs.
#[async_trait]
pub trait ClueStore: Send + Sync {
    async fn list_puzzle_dates(&self) -> Result<Vec<String>, StoreError>;

    async fn get_puzzle(&self, puzzle_date: &str) -> Result<Option<PuzzleRecord>, StoreError>;

    /// Writes the record and registers its date.
    async fn put_puzzle(&self, record: &PuzzleRecord) -> Result<(), StoreError>;

    /// A clue that was never attempted has an empty log.
    async fn get_attempts(&self, puzzle_date: &str, clue_id: &str) -> Result<AttemptLog, StoreError>;

    /// Atomic append. Returns the log length after the append.
    async fn append_attempt(
        &self,
        puzzle_date: &str,
        clue_id: &str,
        attempt: AttemptRecord,
    ) -> Result<usize, StoreError>;

    async fn ping(&self) -> bool;

    fn backend(&self) -> &'static str;
}
