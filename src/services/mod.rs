pub mod analytics;
pub mod drill;
pub mod puzzles;

use futures::future::FutureExt;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::store::{ClueStore, StoreError};
use crate::types::{AttemptLog, PuzzleRecord};

pub const DEFAULT_FETCH_CONCURRENCY: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum DrillError {
    #[error("no puzzles found")]
    NoPuzzles,
    #[error("no completed clues found")]
    NoEligibleClues,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetches every listed puzzle, keeping the order of `dates`. Dates whose
/// record is missing come back as `None`.
pub(crate) async fn fetch_puzzles(
    store: &dyn ClueStore,
    dates: &[String],
    concurrency: usize,
) -> Result<Vec<(String, Option<PuzzleRecord>)>, StoreError> {
    stream::iter(dates.iter())
        .map(|date| async move {
            let record = store.get_puzzle(date).await?;
            Ok::<_, StoreError>((date.clone(), record))
        })
        .buffered(concurrency.max(1))
        .try_collect::<Vec<_>>()
        .boxed()
        .await
}

/// Fetches attempt logs for `(puzzle_date, clue_id)` pairs concurrently,
/// keeping input order. Any store failure aborts the whole batch.
pub(crate) async fn fetch_attempt_logs(
    store: &dyn ClueStore,
    keys: &[(String, String)],
    concurrency: usize,
) -> Result<Vec<AttemptLog>, StoreError> {
    stream::iter(keys.iter())
        .map(|(date, clue_id)| store.get_attempts(date, clue_id))
        .buffered(concurrency.max(1))
        .try_collect::<Vec<_>>()
        .boxed()
        .await
}

pub(crate) async fn sorted_puzzle_dates(store: &dyn ClueStore) -> Result<Vec<String>, StoreError> {
    let mut dates = store.list_puzzle_dates().await?;
    dates.sort();
    dates.dedup();
    Ok(dates)
}

pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<(), DrillError> {
    if value.trim().is_empty() {
        return Err(DrillError::InvalidInput(format!("missing {field}")));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;

    use crate::store::{ClueStore, MemoryClueStore, StoreError};
    use crate::types::{AttemptLog, AttemptRecord, PuzzleRecord};

    /// Memory store whose attempt log for one clue id is unreadable.
    pub(crate) struct BrokenLogStore {
        pub inner: MemoryClueStore,
        pub broken_clue_id: &'static str,
    }

    #[async_trait]
    impl ClueStore for BrokenLogStore {
        async fn list_puzzle_dates(&self) -> Result<Vec<String>, StoreError> {
            self.inner.list_puzzle_dates().await
        }

        async fn get_puzzle(&self, puzzle_date: &str) -> Result<Option<PuzzleRecord>, StoreError> {
            self.inner.get_puzzle(puzzle_date).await
        }

        async fn put_puzzle(&self, record: &PuzzleRecord) -> Result<(), StoreError> {
            self.inner.put_puzzle(record).await
        }

        async fn get_attempts(&self, puzzle_date: &str, clue_id: &str) -> Result<AttemptLog, StoreError> {
            if clue_id == self.broken_clue_id {
                let err = serde_json::from_str::<AttemptRecord>("{garbled")
                    .expect_err("garbled payload must not parse");
                return Err(StoreError::Serde(err));
            }
            self.inner.get_attempts(puzzle_date, clue_id).await
        }

        async fn append_attempt(
            &self,
            puzzle_date: &str,
            clue_id: &str,
            attempt: AttemptRecord,
        ) -> Result<usize, StoreError> {
            self.inner.append_attempt(puzzle_date, clue_id, attempt).await
        }

        async fn ping(&self) -> bool {
            true
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }
}
