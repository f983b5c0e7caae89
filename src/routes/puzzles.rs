use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError};
use crate::services::puzzles;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdatePuzzleRequest {
    marked_complete: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkedBody {
    marked_complete: bool,
}

pub(super) async fn update_puzzle(
    State(state): State<AppState>,
    Path(puzzle_date): Path<String>,
    payload: Result<Json<UpdatePuzzleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let Some(marked_complete) = body.marked_complete else {
        return Err(AppError::validation("markedComplete must be a boolean"));
    };

    let store = state.store();
    let marked_complete =
        puzzles::set_marked_complete(store.as_ref(), &puzzle_date, marked_complete, Utc::now())
            .await?;
    Ok(ok(MarkedBody { marked_complete }))
}
