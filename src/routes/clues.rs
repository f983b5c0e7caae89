use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError};
use crate::services::puzzles::{self, ClueUpdate, IncompleteClue};
use crate::state::AppState;
use crate::types::ClueRecord;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveCluesRequest {
    puzzle_date: Option<String>,
    clues: Option<Vec<ClueRecord>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DateQuery {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeleteQuery {
    puzzle_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateClueRequest {
    puzzle_date: Option<String>,
    updates: Option<ClueUpdate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedBody {
    puzzle_date: String,
}

#[derive(Serialize)]
struct ClueBody {
    clue: ClueRecord,
}

#[derive(Serialize)]
struct IncompleteBody {
    clues: Vec<IncompleteClue>,
    total: usize,
}

#[derive(Serialize)]
struct Empty {}

pub(super) async fn save_clues(
    State(state): State<AppState>,
    payload: Result<Json<SaveCluesRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let (Some(puzzle_date), Some(clues)) = (body.puzzle_date, body.clues) else {
        return Err(AppError::validation("Missing puzzleDate or clues array"));
    };

    let store = state.store();
    let record = puzzles::save_puzzle(store.as_ref(), &puzzle_date, clues, Utc::now()).await?;
    Ok(ok(SavedBody {
        puzzle_date: record.puzzle_date,
    }))
}

/// With `?date=` returns that puzzle and its quiz stats, otherwise the list of
/// saved puzzles.
pub(super) async fn get_clues(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Response, AppError> {
    let store = state.store();

    match query.date.filter(|d| !d.trim().is_empty()) {
        Some(date) => {
            let detail =
                puzzles::get_puzzle_with_stats(store.as_ref(), &date, state.fetch_concurrency())
                    .await?;
            Ok(Json(detail).into_response())
        }
        None => {
            let list = puzzles::list_puzzles(store.as_ref(), state.fetch_concurrency()).await?;
            Ok(Json(list).into_response())
        }
    }
}

pub(super) async fn incomplete(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.store();
    let clues = puzzles::list_incomplete_clues(store.as_ref(), state.fetch_concurrency()).await?;
    Ok(Json(IncompleteBody {
        total: clues.len(),
        clues,
    }))
}

pub(super) async fn update_clue(
    State(state): State<AppState>,
    Path(clue_id): Path<String>,
    payload: Result<Json<UpdateClueRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let (Some(puzzle_date), Some(updates)) = (body.puzzle_date, body.updates) else {
        return Err(AppError::validation("Missing puzzleDate or updates"));
    };

    let store = state.store();
    let clue =
        puzzles::update_clue(store.as_ref(), &puzzle_date, &clue_id, updates, Utc::now()).await?;
    Ok(ok(ClueBody { clue }))
}

pub(super) async fn delete_clue(
    State(state): State<AppState>,
    Path(clue_id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let Some(puzzle_date) = query.puzzle_date else {
        return Err(AppError::validation("Missing puzzleDate"));
    };

    let store = state.store();
    puzzles::delete_clue(store.as_ref(), &puzzle_date, &clue_id, Utc::now()).await?;
    Ok(ok(Empty {}))
}
