use perks_core::simulator::SimulatorError;
use perks_core::CoreError;
use perks_shared::ServiceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One half of a travel package search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Flight,
    Hotel,
}

impl Leg {
    pub fn service(&self) -> ServiceKind {
        match self {
            Leg::Flight => ServiceKind::Travel,
            Leg::Hotel => ServiceKind::Hotel,
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Flight => f.write_str("flight"),
            Leg::Hotel => f.write_str("hotel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegFailure {
    pub leg: Leg,
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Unavailable(#[from] SimulatorError),

    #[error("travel package search failed for {}", legs(.failed))]
    PartialFailure { failed: Vec<Leg>, errors: Vec<LegFailure> },

    #[error(transparent)]
    Offer(CoreError),
}

fn legs(failed: &[Leg]) -> String {
    failed.iter().map(Leg::to_string).collect::<Vec<_>>().join(" and ")
}

impl AggregateError {
    pub fn partial_failure(failures: Vec<(Leg, SimulatorError)>) -> Self {
        AggregateError::PartialFailure {
            failed: failures.iter().map(|(leg, _)| *leg).collect(),
            errors: failures
                .into_iter()
                .map(|(leg, err)| LegFailure {
                    leg,
                    error: err.to_string(),
                })
                .collect(),
        }
    }
}

impl From<CoreError> for AggregateError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError { field, message } => AggregateError::Validation { field, message },
            other => AggregateError::Offer(other),
        }
    }
}

pub type AggResult<T> = Result<T, AggregateError>;
