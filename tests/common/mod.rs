#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;

use clue_drill::config::Config;
use clue_drill::scoring::{RandomSource, SeededRandom};
use clue_drill::state::AppState;
use clue_drill::store::{ClueStore, MemoryClueStore, StoreError};
use clue_drill::types::{AttemptLog, AttemptRecord, PuzzleRecord};

/// App over a fresh in-memory store with deterministic selection draws.
pub fn create_test_app() -> Router {
    create_test_app_with_store(Arc::new(MemoryClueStore::new()))
}

pub fn create_test_app_with_store(store: Arc<dyn ClueStore>) -> Router {
    let state = AppState::new(store, &Config::default()).with_random(Arc::new(|| {
        Box::new(SeededRandom::new(7)) as Box<dyn RandomSource>
    }));
    clue_drill::create_app(state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// One solved and one unsolved clue for the given date.
pub fn sample_puzzle(date: &str) -> Value {
    serde_json::json!({
        "puzzleDate": date,
        "clues": [
            {
                "number": 1,
                "direction": "across",
                "text": "Feline friend",
                "pattern": "___",
                "answer": "CAT"
            },
            {
                "number": 2,
                "direction": "down",
                "text": "Not yet solved",
                "pattern": "____",
                "answer": "DO"
            }
        ]
    })
}

/// Delegates to a memory store but every attempt log read fails to decode.
pub struct CorruptLogStore {
    pub inner: MemoryClueStore,
}

#[async_trait]
impl ClueStore for CorruptLogStore {
    async fn list_puzzle_dates(&self) -> Result<Vec<String>, StoreError> {
        self.inner.list_puzzle_dates().await
    }

    async fn get_puzzle(&self, puzzle_date: &str) -> Result<Option<PuzzleRecord>, StoreError> {
        self.inner.get_puzzle(puzzle_date).await
    }

    async fn put_puzzle(&self, record: &PuzzleRecord) -> Result<(), StoreError> {
        self.inner.put_puzzle(record).await
    }

    async fn get_attempts(&self, _puzzle_date: &str, _clue_id: &str) -> Result<AttemptLog, StoreError> {
        let err = serde_json::from_str::<AttemptRecord>("{garbled").unwrap_err();
        Err(StoreError::Serde(err))
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
        "corrupt"
    }
}
