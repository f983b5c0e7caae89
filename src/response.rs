use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::DrillError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
    is_operational: bool,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn method_not_allowed() -> Self {
        Self::operational(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "Method not allowed",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            is_operational: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn operational(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            is_operational: true,
        }
    }
}

impl From<DrillError> for AppError {
    fn from(err: DrillError) -> Self {
        match err {
            DrillError::NoPuzzles => Self::not_found("No puzzles found"),
            DrillError::NoEligibleClues => Self::not_found("No completed clues found"),
            DrillError::NotFound(message) => Self::not_found(message),
            DrillError::InvalidInput(message) => Self::validation(message),
            DrillError::Store(err) => {
                tracing::error!(error = %err, "clue store failure");
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_operational {
            self.message
        } else {
            "Internal server error".to_string()
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code,
        };

        (self.status, Json(body)).into_response()
    }
}

pub fn json_error(
    status: StatusCode,
    code: impl Into<String>,
    message: impl Into<String>,
) -> AppError {
    AppError::operational(status, code, message)
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<SuccessResponse<T>> {
    Json(SuccessResponse {
        success: true,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_drill_errors_map_to_status() {
        assert_eq!(AppError::from(DrillError::NoPuzzles).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::from(DrillError::NoEligibleClues).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(DrillError::InvalidInput("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );

        let serde_err = serde_json::from_str::<bool>("nope").unwrap_err();
        let store = DrillError::Store(StoreError::from(serde_err));
        assert_eq!(AppError::from(store).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
