use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use super::{keys, ClueStore, StoreError};
use crate::types::{AttemptLog, AttemptRecord, PuzzleRecord};

/// Puzzles are JSON strings, the date index is a set, and each attempt log is
/// a Redis list of JSON attempts so appends are a single `RPUSH`.
#[derive(Clone)]
pub struct RedisClueStore {
    connection: MultiplexedConnection,
}

impl RedisClueStore {
    pub fn new(connection: MultiplexedConnection) -> Self {
        Self { connection }
    }

    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let connection = client.get_multiplexed_tokio_connection().await?;
        Ok(Self::new(connection))
    }
}

#[async_trait]
impl ClueStore for RedisClueStore {
    async fn list_puzzle_dates(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection.clone();
        let dates: Vec<String> = conn.smembers(keys::puzzle_dates_key()).await?;
        Ok(dates)
    }

    async fn get_puzzle(&self, puzzle_date: &str) -> Result<Option<PuzzleRecord>, StoreError> {
        let mut conn = self.connection.clone();
        let payload: Option<String> = conn.get(keys::puzzle_key(puzzle_date)).await?;
        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn put_puzzle(&self, record: &PuzzleRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)?;
        let mut conn = self.connection.clone();
        redis::pipe()
            .atomic()
            .set(keys::puzzle_key(&record.puzzle_date), payload)
            .ignore()
            .sadd(keys::puzzle_dates_key(), &record.puzzle_date)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get_attempts(&self, puzzle_date: &str, clue_id: &str) -> Result<AttemptLog, StoreError> {
        let mut conn = self.connection.clone();
        let payloads: Vec<String> = conn
            .lrange(keys::attempts_key(puzzle_date, clue_id), 0, -1)
            .await?;

        payloads
            .iter()
            .map(|p| serde_json::from_str::<AttemptRecord>(p).map_err(StoreError::from))
            .collect()
    }

    async fn append_attempt(
        &self,
        puzzle_date: &str,
        clue_id: &str,
        attempt: AttemptRecord,
    ) -> Result<usize, StoreError> {
        let payload = serde_json::to_string(&attempt)?;
        let mut conn = self.connection.clone();
        let len: usize = conn
            .rpush(keys::attempts_key(puzzle_date, clue_id), payload)
            .await?;
        Ok(len)
    }

    async fn ping(&self) -> bool {
        let mut conn = self.connection.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
