use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use perks_core::simulator::{SimulatorError, UnavailableCause};
use perks_core::CoreError;
use perks_integration::{AggregateError, Leg, LegFailure};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError { field: String, message: String },
    NotFoundError(String),
    ConflictError(String),
    Unavailable(SimulatorError),
    PartialFailure { failed: Vec<Leg>, errors: Vec<LegFailure> },
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Status for a simulator that could not give a usable answer.
///
/// A 4xx from the simulator is the caller's problem and keeps its code.
fn unavailable_status(cause: &UnavailableCause) -> StatusCode {
    match cause {
        UnavailableCause::Timeout => StatusCode::GATEWAY_TIMEOUT,
        UnavailableCause::Connect(_) | UnavailableCause::Transport(_) | UnavailableCause::Malformed(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        UnavailableCause::Status { code, .. } => match StatusCode::from_u16(*code) {
            Ok(status) if status.is_client_error() => status,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("invalid {}: {}", field, message), "field": field }),
            ),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Unavailable(err) => {
                let status = unavailable_status(err.cause());
                let message = match err.cause() {
                    UnavailableCause::Status { message, .. } if status.is_client_error() => message.clone(),
                    _ => err.to_string(),
                };
                (status, json!({ "error": message, "service": err.service() }))
            }
            AppError::PartialFailure { failed, errors } => {
                let message = AggregateError::PartialFailure {
                    failed: failed.clone(),
                    errors: Vec::new(),
                }
                .to_string();
                (
                    StatusCode::MULTI_STATUS,
                    json!({ "error": message, "failed_legs": failed, "errors": errors }),
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError { field, message } => AppError::ValidationError { field, message },
            CoreError::NotFound(msg) => AppError::NotFoundError(msg),
            CoreError::Conflict(msg) => AppError::ConflictError(msg),
            CoreError::InternalError(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<AggregateError> for AppError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::Validation { field, message } => AppError::ValidationError { field, message },
            AggregateError::Unavailable(err) => AppError::Unavailable(err),
            AggregateError::PartialFailure { failed, errors } => AppError::PartialFailure { failed, errors },
            AggregateError::Offer(err) => err.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("query", rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perks_shared::ServiceKind;

    fn status_of(cause: UnavailableCause) -> StatusCode {
        AppError::Unavailable(SimulatorError::unavailable(ServiceKind::Travel, cause))
            .into_response()
            .status()
    }

    #[test]
    fn test_unavailable_status_mapping() {
        assert_eq!(status_of(UnavailableCause::Timeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status_of(UnavailableCause::Connect("refused".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(UnavailableCause::Malformed("bad json".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(UnavailableCause::Status { code: 404, message: "Booking not found".to_string() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(UnavailableCause::Status { code: 500, message: "boom".to_string() }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_core_errors_keep_their_meaning() {
        let conflict: AppError = CoreError::Conflict("already active".to_string()).into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let partial: AppError = AggregateError::PartialFailure { failed: vec![Leg::Hotel], errors: Vec::new() }.into();
        assert_eq!(partial.into_response().status(), StatusCode::MULTI_STATUS);
    }
}
