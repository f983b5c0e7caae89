use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::now_ms;
use crate::config::parse_bool;
use crate::response::{ok, AppError};
use crate::scoring::ClueWindowStats;
use crate::services::drill::{self, DrillOptions};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NextClueQuery {
    include_complete: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatsQuery {
    clue_id: Option<String>,
    puzzle_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecordAttemptRequest {
    clue_id: Option<String>,
    puzzle_date: Option<String>,
    correct: Option<bool>,
}

#[derive(Debug, Serialize)]
struct StatsBody {
    stats: ClueWindowStats,
}

pub(super) async fn next_clue(
    State(state): State<AppState>,
    Query(query): Query<NextClueQuery>,
) -> Result<impl IntoResponse, AppError> {
    let include_marked_complete = match query.include_complete.as_deref() {
        Some(raw) => parse_bool(raw).ok_or_else(|| {
            AppError::validation("includeComplete must be a boolean")
        })?,
        None => state.include_complete_default(),
    };

    let options = DrillOptions {
        include_marked_complete,
        fetch_concurrency: state.fetch_concurrency(),
    };
    let store = state.store();
    let mut rng = state.random_source();

    let next = drill::get_next_clue(store.as_ref(), rng.as_mut(), options, now_ms()).await?;
    Ok(Json(next))
}

pub(super) async fn clue_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(clue_id), Some(puzzle_date)) = (query.clue_id, query.puzzle_date) else {
        return Err(AppError::validation("Missing clueId or puzzleDate"));
    };

    let store = state.store();
    let stats = drill::get_clue_stats(store.as_ref(), &clue_id, &puzzle_date, now_ms()).await?;
    Ok(Json(StatsBody { stats }))
}

pub(super) async fn record_attempt(
    State(state): State<AppState>,
    payload: Result<Json<RecordAttemptRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let (Some(clue_id), Some(puzzle_date), Some(correct)) =
        (body.clue_id, body.puzzle_date, body.correct)
    else {
        return Err(AppError::validation("Missing clueId, puzzleDate, or correct"));
    };

    let store = state.store();
    let stats =
        drill::record_attempt(store.as_ref(), &clue_id, &puzzle_date, correct, now_ms()).await?;
    Ok(ok(StatsBody { stats }))
}
