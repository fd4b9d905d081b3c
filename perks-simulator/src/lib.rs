use axum::{http::StatusCode, Json, Router};
use chrono::{NaiveDate, Utc};
use perks_shared::models::status::HealthReport;
use perks_shared::models::CancellationOutcome;
use perks_shared::ServiceKind;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod hotel;
pub mod pricing;
pub mod shopping;
pub mod travel;

use error::SimError;

/// Router of the simulator standing in for `service`.
pub fn router_for(service: ServiceKind) -> Router {
    let routes = match service {
        ServiceKind::Travel => travel::routes(),
        ServiceKind::Hotel => hotel::routes(),
        ServiceKind::Shopping => shopping::routes(),
    };
    routes
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

/// Binds `port` on all interfaces and serves the simulator until the task is dropped.
pub async fn serve(service: ServiceKind, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("{} listening on {}", service.simulator_name(), listener.local_addr()?);
    axum::serve(listener, router_for(service)).await?;
    Ok(())
}

async fn not_found() -> SimError {
    SimError::NotFound("Endpoint not found".to_string())
}

pub(crate) fn health_report(service: ServiceKind) -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy".to_string(),
        service: service.simulator_name().to_string(),
        timestamp: Utc::now(),
    })
}

/// A refused cancellation is answered with 400 and the outcome as body.
pub(crate) fn cancellation_response(outcome: CancellationOutcome) -> (StatusCode, Json<CancellationOutcome>) {
    let status = if outcome.success { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    (status, Json(outcome))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, SimError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| SimError::bad_request("Invalid date format. Use YYYY-MM-DD"))
}

pub(crate) fn parse_count(field: &str, raw: Option<&str>, default: u32) -> Result<u32, SimError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(SimError::bad_request(format!("{} must be a positive integer", field))),
        },
    }
}
