use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

use std::sync::Arc;

use chrono::Utc;
use clue_drill::store::{ClueStore, MemoryClueStore};
use clue_drill::types::{ClueRecord, Direction, PuzzleRecord};
use common::{
    body_json, create_test_app, create_test_app_with_store, get, json_request, sample_puzzle,
    CorruptLogStore,
};

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = create_test_app();

    let response = app.oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health_root() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_health_live_and_info() {
    let app = create_test_app();

    let response = app.clone().oneshot(get("/health/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/health/info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["service"], "clue-drill");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_quiz_on_empty_store_is_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get("/api/quiz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No puzzles found");
}

#[tokio::test]
async fn test_save_then_quiz_returns_completed_clue() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/clues", sample_puzzle("2024-03-01")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/quiz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["clue"]["clueId"], "across-1");
    assert_eq!(body["clue"]["puzzleDate"], "2024-03-01");
    assert_eq!(body["totalCompleted"], 1);
    assert_eq!(body["attempts"], 0);
    assert_eq!(body["spacedRepetition"]["priority"], -1000.0);
}

#[tokio::test]
async fn test_record_attempt_requires_correct_flag() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/quiz-attempt",
            json!({ "clueId": "across-1", "puzzleDate": "2024-03-01" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing clueId, puzzleDate, or correct");
}

#[tokio::test]
async fn test_record_attempt_then_stats() {
    let app = create_test_app();

    for correct in [true, false, true] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/quiz-attempt",
                json!({ "clueId": "across-1", "puzzleDate": "2024-03-01", "correct": correct }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
    }

    let response = app
        .oneshot(get("/api/quiz-attempt?clueId=across-1&puzzleDate=2024-03-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["stats"]["lifetime"]["total"], 3);
    assert_eq!(body["stats"]["lifetime"]["correct"], 2);
    assert_eq!(body["stats"]["lifetime"]["percent"], 67);
    assert_eq!(body["stats"]["lastHour"]["total"], 3);
}

#[tokio::test]
async fn test_marked_complete_puzzle_is_skipped_by_default() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("POST", "/api/clues", sample_puzzle("2024-03-01")))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/puzzle/2024-03-01",
            json!({ "markedComplete": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["markedComplete"], true);

    let response = app.clone().oneshot(get("/api/quiz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No completed clues found");

    let response = app
        .oneshot(get("/api/quiz?includeComplete=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_performance_lists_unseen_clue() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("POST", "/api/clues", sample_puzzle("2024-03-01")))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/performance")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["clues"][0]["clueId"], "across-1");
    assert_eq!(body["clues"][0]["stats"]["total"], 0);
}

#[tokio::test]
async fn test_puzzle_stats_and_incomplete() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("POST", "/api/clues", sample_puzzle("2024-03-01")))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/api/puzzle-stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["puzzles"][0]["date"], "2024-03-01");
    assert_eq!(body["puzzles"][0]["complete"], 1);
    assert_eq!(body["puzzles"][0]["incomplete"], 1);

    let response = app.oneshot(get("/api/incomplete")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["clues"][0]["direction"], "down");
}

#[tokio::test]
async fn test_update_clue_validates_answer_length() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("POST", "/api/clues", sample_puzzle("2024-03-01")))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/clue/down-2",
            json!({ "puzzleDate": "2024-03-01", "updates": { "answer": "DOG" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Answer must be 4 characters");

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/api/clue/down-2",
            json!({ "puzzleDate": "2024-03-01", "updates": { "answer": "DOGS" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["clue"]["answer"], "DOGS");
}

#[tokio::test]
async fn test_get_clues_for_date_and_delete() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("POST", "/api/clues", sample_puzzle("2024-03-01")))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("DELETE")
                .uri("/api/clue/down-2?puzzleDate=2024-03-01")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/clues?date=2024-03-01")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["clues"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("DELETE", "/api/quiz", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_store_failure_is_500_without_details() {
    let store = CorruptLogStore {
        inner: MemoryClueStore::new(),
    };
    let clue = ClueRecord::new(1, Direction::Across, "Feline friend")
        .with_pattern("___")
        .with_answer("CAT");
    store
        .put_puzzle(&PuzzleRecord::new("2024-03-01", vec![clue], Utc::now()))
        .await
        .unwrap();
    let app = create_test_app_with_store(Arc::new(store));

    for uri in ["/api/quiz", "/api/performance"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["code"], "INTERNAL_ERROR");
        let text = body.to_string();
        assert!(!text.contains("line 1"), "leaked store error: {text}");
        assert!(!text.contains("malformed record"), "leaked store error: {text}");
    }
}
