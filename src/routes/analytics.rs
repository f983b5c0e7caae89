use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use super::now_ms;
use crate::response::AppError;
use crate::services::analytics::{self, PerformanceEntry, PuzzleQuizSummary};
use crate::state::AppState;

#[derive(Serialize)]
struct PerformanceBody {
    clues: Vec<PerformanceEntry>,
    total: usize,
}

#[derive(Serialize)]
struct PuzzleStatsBody {
    puzzles: Vec<PuzzleQuizSummary>,
}

pub(super) async fn performance(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.store();
    let clues =
        analytics::get_performance_report(store.as_ref(), now_ms(), state.fetch_concurrency()).await?;
    Ok(Json(PerformanceBody {
        total: clues.len(),
        clues,
    }))
}

pub(super) async fn puzzle_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.store();
    let puzzles =
        analytics::puzzle_stats(store.as_ref(), now_ms(), state.fetch_concurrency()).await?;
    Ok(Json(PuzzleStatsBody { puzzles }))
}
