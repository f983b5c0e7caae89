mod analytics;
mod clues;
mod health;
mod puzzles;
mod quiz;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::Router;
use chrono::Utc;

use crate::response::{json_error, AppError};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/quiz",
            get(quiz::next_clue).fallback(method_not_allowed),
        )
        .route(
            "/api/quiz-attempt",
            get(quiz::clue_stats)
                .post(quiz::record_attempt)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/performance",
            get(analytics::performance).fallback(method_not_allowed),
        )
        .route(
            "/api/puzzle-stats",
            get(analytics::puzzle_stats).fallback(method_not_allowed),
        )
        .route(
            "/api/clues",
            get(clues::get_clues)
                .post(clues::save_clues)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/incomplete",
            get(clues::incomplete).fallback(method_not_allowed),
        )
        .route(
            "/api/clue/:id",
            patch(clues::update_clue)
                .delete(clues::delete_clue)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/puzzle/:date",
            patch(puzzles::update_puzzle).fallback(method_not_allowed),
        )
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found").into_response()
}
