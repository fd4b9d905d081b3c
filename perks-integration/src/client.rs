//! HTTP clients for the three partner simulators.
//!
//! Every failure, whether transport, status or payload, comes back as
//! [`SimulatorError::Unavailable`] so callers never see a raw `reqwest` error.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use perks_core::search::{FlightSearchQuery, HotelSearchQuery, ProductSearchQuery};
use perks_core::simulator::{
    HealthProbe, HotelSimulator, ShoppingSimulator, SimResult, SimulatorError, TravelSimulator, UnavailableCause,
};
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
use perks_shared::{ServiceKind, Validate};
use perks_store::app_config::SimulatorEndpoints;

/// Shared `reqwest` client with the per-request timeout applied to every call.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

fn classify(err: &reqwest::Error) -> UnavailableCause {
    if err.is_timeout() {
        UnavailableCause::Timeout
    } else if err.is_connect() {
        UnavailableCause::Connect(err.to_string())
    } else if err.is_decode() {
        UnavailableCause::Malformed(err.to_string())
    } else {
        UnavailableCause::Transport(err.to_string())
    }
}

/// Request plumbing for one simulator.
#[derive(Debug, Clone)]
pub struct SimulatorHttp {
    client: Client,
    service: ServiceKind,
    base: Url,
    base_url: String,
}

impl SimulatorHttp {
    pub fn new(client: Client, service: ServiceKind, base_url: &str) -> SimResult<Self> {
        let base = Url::parse(base_url).map_err(|e| {
            SimulatorError::unavailable(
                service,
                UnavailableCause::Transport(format!("invalid base url `{}`: {}", base_url, e)),
            )
        })?;
        if base.cannot_be_a_base() {
            return Err(SimulatorError::unavailable(
                service,
                UnavailableCause::Transport(format!("`{}` cannot be used as a base url", base_url)),
            ));
        }
        Ok(Self {
            client,
            service,
            base,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn service(&self) -> ServiceKind {
        self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unavailable(&self, cause: UnavailableCause) -> SimulatorError {
        SimulatorError::unavailable(self.service, cause)
    }

    /// `base` plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> SimResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| self.unavailable(UnavailableCause::Transport("base url cannot carry a path".to_string())))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T>(&self, segments: &[&str], query: &[(&'static str, String)]) -> SimResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let url = self.endpoint(segments)?;
        self.send(self.client.get(url).query(query)).await
    }

    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> SimResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Validate,
    {
        let url = self.endpoint(segments)?;
        self.send(self.client.post(url).json(body)).await
    }

    pub async fn post_empty<T>(&self, segments: &[&str]) -> SimResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let url = self.endpoint(segments)?;
        self.send(self.client.post(url)).await
    }

    async fn send<T>(&self, request: RequestBuilder) -> SimResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let response = request.send().await.map_err(|e| self.failed(&e))?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await.map_err(|e| self.failed(&e))?;
        debug!("{} {} -> {}", self.service, url.path(), status);

        if !status.is_success() {
            let message = serde_json::from_slice::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected status").to_string());
            warn!("{} simulator answered {} on {}: {}", self.service, status, url.path(), message);
            return Err(self.unavailable(UnavailableCause::Status {
                code: status.as_u16(),
                message,
            }));
        }

        let payload: T = serde_json::from_slice(&body).map_err(|e| {
            warn!("{} simulator sent an undecodable body on {}: {}", self.service, url.path(), e);
            self.unavailable(UnavailableCause::Malformed(e.to_string()))
        })?;
        payload.validate().map_err(|reason| {
            warn!("{} simulator sent an invalid payload on {}: {}", self.service, url.path(), reason);
            self.unavailable(UnavailableCause::Malformed(reason))
        })?;
        Ok(payload)
    }

    fn failed(&self, err: &reqwest::Error) -> SimulatorError {
        let cause = classify(err);
        warn!("{} simulator call failed: {}", self.service, cause);
        self.unavailable(cause)
    }

    async fn health(&self) -> SimResult<HealthReport> {
        self.get(&["health"], &[]).await
    }
}

macro_rules! health_probe {
    ($client:ty) => {
        #[async_trait]
        impl HealthProbe for $client {
            fn service(&self) -> ServiceKind {
                self.http.service()
            }

            fn base_url(&self) -> &str {
                self.http.base_url()
            }

            async fn health(&self) -> SimResult<HealthReport> {
                self.http.health().await
            }
        }
    };
}

#[derive(Debug, Clone)]
pub struct TravelClient {
    http: SimulatorHttp,
}

impl TravelClient {
    pub fn new(client: Client, base_url: &str) -> SimResult<Self> {
        Ok(Self {
            http: SimulatorHttp::new(client, ServiceKind::Travel, base_url)?,
        })
    }
}

health_probe!(TravelClient);

#[async_trait]
impl TravelSimulator for TravelClient {
    async fn airports(&self) -> SimResult<AirportsResponse> {
        self.http.get(&["airports"], &[]).await
    }

    async fn search_flights(&self, query: &FlightSearchQuery) -> SimResult<FlightSearchResponse> {
        self.http.get(&["search", "flights"], &query.to_pairs()).await
    }

    async fn book_flight(&self, request: &FlightBookingRequest) -> SimResult<FlightBookingConfirmation> {
        self.http.post(&["book", "flight"], request).await
    }

    async fn booking(&self, reference: &str) -> SimResult<FlightBookingRecord> {
        self.http.get(&["booking", reference], &[]).await
    }

    async fn cancel_booking(&self, booking_id: &str) -> SimResult<CancellationOutcome> {
        self.http.post_empty(&["cancel", booking_id]).await
    }
}

#[derive(Debug, Clone)]
pub struct HotelClient {
    http: SimulatorHttp,
}

impl HotelClient {
    pub fn new(client: Client, base_url: &str) -> SimResult<Self> {
        Ok(Self {
            http: SimulatorHttp::new(client, ServiceKind::Hotel, base_url)?,
        })
    }
}

health_probe!(HotelClient);

#[async_trait]
impl HotelSimulator for HotelClient {
    async fn cities(&self) -> SimResult<CitiesResponse> {
        self.http.get(&["cities"], &[]).await
    }

    async fn search_hotels(&self, query: &HotelSearchQuery) -> SimResult<HotelSearchResponse> {
        self.http.get(&["search", "hotels"], &query.to_pairs()).await
    }

    async fn book_hotel(&self, request: &HotelBookingRequest) -> SimResult<HotelBookingConfirmation> {
        self.http.post(&["book", "hotel"], request).await
    }

    async fn booking(&self, reference: &str) -> SimResult<HotelBookingRecord> {
        self.http.get(&["booking", reference], &[]).await
    }

    async fn cancel_booking(&self, booking_id: &str) -> SimResult<CancellationOutcome> {
        self.http.post_empty(&["cancel", booking_id]).await
    }
}

#[derive(Debug, Clone)]
pub struct ShoppingClient {
    http: SimulatorHttp,
}

impl ShoppingClient {
    pub fn new(client: Client, base_url: &str) -> SimResult<Self> {
        Ok(Self {
            http: SimulatorHttp::new(client, ServiceKind::Shopping, base_url)?,
        })
    }
}

health_probe!(ShoppingClient);

#[async_trait]
impl ShoppingSimulator for ShoppingClient {
    async fn categories(&self) -> SimResult<CategoriesResponse> {
        self.http.get(&["categories"], &[]).await
    }

    async fn brands(&self, category: Option<&str>) -> SimResult<BrandsResponse> {
        let query: Vec<(&'static str, String)> = category.map(|c| ("category", c.to_string())).into_iter().collect();
        self.http.get(&["brands"], &query).await
    }

    async fn search_products(&self, query: &ProductSearchQuery) -> SimResult<ProductSearchResponse> {
        self.http.get(&["products", "search"], &query.to_pairs()).await
    }

    async fn product(&self, product_id: &str) -> SimResult<ProductDetails> {
        self.http.get(&["products", product_id], &[]).await
    }

    async fn add_to_cart(&self, request: &CartAddRequest) -> SimResult<CartItem> {
        self.http.post(&["cart", "add"], request).await
    }

    async fn create_order(&self, request: &OrderRequest) -> SimResult<OrderConfirmation> {
        self.http.post(&["order", "create"], request).await
    }

    async fn order(&self, order_id: &str) -> SimResult<OrderStatus> {
        self.http.get(&["order", order_id], &[]).await
    }

    async fn cancel_order(&self, order_id: &str) -> SimResult<CancellationOutcome> {
        self.http.post_empty(&["cancel", order_id]).await
    }
}

/// The three clients built from configuration, sharing one connection pool.
#[derive(Debug, Clone)]
pub struct SimulatorClients {
    pub travel: TravelClient,
    pub hotel: HotelClient,
    pub shopping: ShoppingClient,
}

impl SimulatorClients {
    pub fn from_config(endpoints: &SimulatorEndpoints) -> SimResult<Self> {
        let client = http_client(endpoints.timeout()).map_err(|e| {
            SimulatorError::unavailable(ServiceKind::Travel, UnavailableCause::Transport(e.to_string()))
        })?;
        Ok(Self {
            travel: TravelClient::new(client.clone(), endpoints.url_for(ServiceKind::Travel))?,
            hotel: HotelClient::new(client.clone(), endpoints.url_for(ServiceKind::Hotel))?,
            shopping: ShoppingClient::new(client, endpoints.url_for(ServiceKind::Shopping))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let http = SimulatorHttp::new(Client::new(), ServiceKind::Travel, "http://localhost:5002/").unwrap();
        assert_eq!(http.base_url(), "http://localhost:5002");
        let url = http.endpoint(&["booking", "TB 12/3"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5002/booking/TB%2012%2F3");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let http = SimulatorHttp::new(Client::new(), ServiceKind::Hotel, "http://sims.local/hotel").unwrap();
        let url = http.endpoint(&["search", "hotels"]).unwrap();
        assert_eq!(url.as_str(), "http://sims.local/hotel/search/hotels");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = SimulatorHttp::new(Client::new(), ServiceKind::Shopping, "not a url").unwrap_err();
        assert_eq!(err.service(), ServiceKind::Shopping);
        assert!(matches!(err.cause(), UnavailableCause::Transport(_)));
    }
}
