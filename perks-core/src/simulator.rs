use async_trait::async_trait;
use std::fmt;

use perks_shared::models::hotel::{
    CitiesResponse, HotelBookingConfirmation, HotelBookingRecord, HotelBookingRequest, HotelSearchResponse,
};
use perks_shared::models::shopping::{
    BrandsResponse, CartAddRequest, CartItem, CategoriesResponse, OrderConfirmation, OrderRequest, OrderStatus,
    ProductDetails, ProductSearchResponse,
};
use perks_shared::models::status::HealthReport;
use perks_shared::models::travel::{
    AirportsResponse, FlightBookingConfirmation, FlightBookingRecord, FlightBookingRequest, FlightSearchResponse,
};
use perks_shared::models::CancellationOutcome;
use perks_shared::ServiceKind;

use crate::search::{FlightSearchQuery, HotelSearchQuery, ProductSearchQuery};

/// Why a simulator call produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableCause {
    Timeout,
    Connect(String),
    /// Non-2xx answer; `message` is the simulator's own `error` text when it sent one.
    Status { code: u16, message: String },
    /// Body did not decode or failed payload validation.
    Malformed(String),
    Transport(String),
}

impl fmt::Display for UnavailableCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableCause::Timeout => write!(f, "request timed out"),
            UnavailableCause::Connect(detail) => write!(f, "connection failed: {}", detail),
            UnavailableCause::Status { code, message } => write!(f, "status {}: {}", code, message),
            UnavailableCause::Malformed(detail) => write!(f, "malformed response: {}", detail),
            UnavailableCause::Transport(detail) => write!(f, "transport error: {}", detail),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SimulatorError {
    #[error("{service} service unavailable ({cause})")]
    Unavailable { service: ServiceKind, cause: UnavailableCause },
}

impl SimulatorError {
    pub fn unavailable(service: ServiceKind, cause: UnavailableCause) -> Self {
        SimulatorError::Unavailable { service, cause }
    }

    pub fn service(&self) -> ServiceKind {
        match self {
            SimulatorError::Unavailable { service, .. } => *service,
        }
    }

    pub fn cause(&self) -> &UnavailableCause {
        match self {
            SimulatorError::Unavailable { cause, .. } => cause,
        }
    }

    /// True when the partner itself is at fault. A 4xx means it understood
    /// the call and refused the request.
    pub fn is_outage(&self) -> bool {
        !matches!(self.cause(), UnavailableCause::Status { code, .. } if (400..500).contains(code))
    }
}

pub type SimResult<T> = Result<T, SimulatorError>;

/// Anything that exposes a simulator-style `/health` endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn service(&self) -> ServiceKind;

    fn base_url(&self) -> &str;

    async fn health(&self) -> SimResult<HealthReport>;
}

#[async_trait]
pub trait TravelSimulator: Send + Sync {
    async fn airports(&self) -> SimResult<AirportsResponse>;

    async fn search_flights(&self, query: &FlightSearchQuery) -> SimResult<FlightSearchResponse>;

    async fn book_flight(&self, request: &FlightBookingRequest) -> SimResult<FlightBookingConfirmation>;

    async fn booking(&self, reference: &str) -> SimResult<FlightBookingRecord>;

    async fn cancel_booking(&self, booking_id: &str) -> SimResult<CancellationOutcome>;
}

#[async_trait]
pub trait HotelSimulator: Send + Sync {
    async fn cities(&self) -> SimResult<CitiesResponse>;

    async fn search_hotels(&self, query: &HotelSearchQuery) -> SimResult<HotelSearchResponse>;

    async fn book_hotel(&self, request: &HotelBookingRequest) -> SimResult<HotelBookingConfirmation>;

    async fn booking(&self, reference: &str) -> SimResult<HotelBookingRecord>;

    async fn cancel_booking(&self, booking_id: &str) -> SimResult<CancellationOutcome>;
}

#[async_trait]
pub trait ShoppingSimulator: Send + Sync {
    async fn categories(&self) -> SimResult<CategoriesResponse>;

    async fn brands(&self, category: Option<&str>) -> SimResult<BrandsResponse>;

    async fn search_products(&self, query: &ProductSearchQuery) -> SimResult<ProductSearchResponse>;

    async fn product(&self, product_id: &str) -> SimResult<ProductDetails>;

    async fn add_to_cart(&self, request: &CartAddRequest) -> SimResult<CartItem>;

    async fn create_order(&self, request: &OrderRequest) -> SimResult<OrderConfirmation>;

    async fn order(&self, order_id: &str) -> SimResult<OrderStatus>;

    async fn cancel_order(&self, order_id: &str) -> SimResult<CancellationOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_names_service_and_cause() {
        let err = SimulatorError::unavailable(ServiceKind::Hotel, UnavailableCause::Timeout);
        assert_eq!(err.to_string(), "hotel service unavailable (request timed out)");
        assert_eq!(err.service(), ServiceKind::Hotel);

        let err = SimulatorError::unavailable(
            ServiceKind::Travel,
            UnavailableCause::Status { code: 400, message: "Invalid airport code".to_string() },
        );
        assert_eq!(err.to_string(), "travel service unavailable (status 400: Invalid airport code)");
    }

    #[test]
    fn test_only_partner_faults_are_outages() {
        let status = |code| {
            SimulatorError::unavailable(
                ServiceKind::Travel,
                UnavailableCause::Status { code, message: String::new() },
            )
        };
        assert!(!status(400).is_outage());
        assert!(!status(404).is_outage());
        assert!(status(500).is_outage());
        assert!(status(503).is_outage());
        assert!(SimulatorError::unavailable(ServiceKind::Hotel, UnavailableCause::Timeout).is_outage());
        assert!(SimulatorError::unavailable(ServiceKind::Hotel, UnavailableCause::Malformed("x".into())).is_outage());
    }
}
