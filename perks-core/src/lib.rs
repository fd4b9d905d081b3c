pub mod iata;
pub mod search;
pub mod simulator;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed for `{field}`: {message}")]
    ValidationError { field: String, message: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
