use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error answer of a simulator endpoint, always rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum SimError {
    BadRequest(String),
    NotFound(String),
}

impl SimError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        SimError::BadRequest(msg.into())
    }
}

impl IntoResponse for SimError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            SimError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            SimError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        tracing::debug!("Simulator rejected request ({}): {}", status, error_message);
        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

impl From<JsonRejection> for SimError {
    fn from(rejection: JsonRejection) -> Self {
        SimError::BadRequest(format!("Missing required fields: {}", rejection.body_text()))
    }
}
