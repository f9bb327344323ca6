use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::calendar::CalendarError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Calendar(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
