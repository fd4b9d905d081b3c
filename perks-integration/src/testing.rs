//! In-process partner stand-ins for unit tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::time::Duration;

use perks_core::search::{FlightSearchQuery, HotelSearchQuery, ProductSearchQuery};
use perks_core::simulator::{
    HealthProbe, HotelSimulator, ShoppingSimulator, SimResult, SimulatorError, TravelSimulator, UnavailableCause,
};
use perks_shared::models::hotel::{
    CitiesResponse, Hotel, HotelBookingConfirmation, HotelBookingDetail, HotelBookingRecord, HotelBookingRequest,
    HotelSearchCriteria, HotelSearchResponse,
};
use perks_shared::models::shopping::{
    BrandsResponse, CartAddRequest, CartItem, CategoriesResponse, OrderConfirmation, OrderRequest, OrderStatus,
    Product, ProductDetails, ProductSearchCriteria, ProductSearchResponse,
};
use perks_shared::models::status::HealthReport;
use perks_shared::models::travel::{
    Airport, AirportsResponse, Flight, FlightBookingConfirmation, FlightBookingDetail, FlightBookingRecord,
    FlightBookingRequest, FlightSearchCriteria, FlightSearchResponse,
};
use perks_shared::models::CancellationOutcome;
use perks_shared::ServiceKind;

async fn answer<T>(service: ServiceKind, delay: Duration, failure: &Option<UnavailableCause>, value: T) -> SimResult<T> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    match failure {
        Some(cause) => Err(SimulatorError::unavailable(service, cause.clone())),
        None => Ok(value),
    }
}

fn cancelled(reference: &str) -> CancellationOutcome {
    CancellationOutcome {
        success: true,
        reference: reference.to_string(),
        status: Some("cancelled".to_string()),
        original_status: None,
        original_amount: Some(100.0),
        cancellation_fee: Some(0.0),
        refund_amount: Some(100.0),
        processing_time: None,
        message: "cancelled".to_string(),
        error: None,
    }
}

pub struct StubProbe {
    service: ServiceKind,
    delay: Duration,
    failure: Option<UnavailableCause>,
}

impl StubProbe {
    pub fn up(service: ServiceKind, delay: Duration) -> Self {
        Self { service, delay, failure: None }
    }

    pub fn down(service: ServiceKind) -> Self {
        Self {
            service,
            delay: Duration::ZERO,
            failure: Some(UnavailableCause::Connect("connection refused".to_string())),
        }
    }
}

#[async_trait]
impl HealthProbe for StubProbe {
    fn service(&self) -> ServiceKind {
        self.service
    }

    fn base_url(&self) -> &str {
        "http://stub.invalid"
    }

    async fn health(&self) -> SimResult<HealthReport> {
        let report = HealthReport {
            status: "healthy".to_string(),
            service: self.service.simulator_name().to_string(),
            timestamp: Utc::now(),
        };
        answer(self.service, self.delay, &self.failure, report).await
    }
}

#[derive(Default)]
pub struct StubTravel {
    pub flights: Vec<Flight>,
    pub delay: Duration,
    pub failure: Option<UnavailableCause>,
    pub bookings: Mutex<Vec<FlightBookingRequest>>,
}

impl StubTravel {
    pub fn with_flights(flights: Vec<Flight>) -> Self {
        Self { flights, ..Default::default() }
    }

    pub fn failing(cause: UnavailableCause) -> Self {
        Self { failure: Some(cause), ..Default::default() }
    }

    pub fn booked(&self) -> usize {
        self.bookings.lock().map(|b| b.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TravelSimulator for StubTravel {
    async fn airports(&self) -> SimResult<AirportsResponse> {
        let airports = vec![Airport {
            code: "NYC".to_string(),
            city: "New York".to_string(),
            name: "John F. Kennedy International".to_string(),
        }];
        answer(ServiceKind::Travel, self.delay, &self.failure, AirportsResponse { airports }).await
    }

    async fn search_flights(&self, query: &FlightSearchQuery) -> SimResult<FlightSearchResponse> {
        let response = FlightSearchResponse {
            search_criteria: FlightSearchCriteria {
                origin: query.origin.clone(),
                destination: query.destination.clone(),
                departure_date: query.departure_date,
                return_date: query.return_date,
                passengers: query.passengers,
            },
            count: self.flights.len(),
            flights: self.flights.clone(),
        };
        answer(ServiceKind::Travel, self.delay, &self.failure, response).await
    }

    async fn book_flight(&self, request: &FlightBookingRequest) -> SimResult<FlightBookingConfirmation> {
        let confirmation = FlightBookingConfirmation {
            booking_reference: "TB100001".to_string(),
            status: "confirmed".to_string(),
            flight_details: FlightBookingDetail {
                flight_id: request.flight_id.clone(),
                booking_time: Utc::now(),
                passengers: request.passenger_details.clone(),
            },
            total_amount: request.total_price.unwrap_or(0.0),
            payment_status: "processed".to_string(),
            confirmation_email_sent: true,
        };
        let result = answer(ServiceKind::Travel, self.delay, &self.failure, confirmation).await;
        if result.is_ok() {
            if let Ok(mut bookings) = self.bookings.lock() {
                bookings.push(request.clone());
            }
        }
        result
    }

    async fn booking(&self, reference: &str) -> SimResult<FlightBookingRecord> {
        let record = FlightBookingRecord {
            booking_reference: reference.to_string(),
            status: "confirmed".to_string(),
            passenger_count: 1,
            total_amount: 420.0,
            booking_date: Utc::now(),
            travel_date: Utc::now().date_naive(),
        };
        answer(ServiceKind::Travel, self.delay, &self.failure, record).await
    }

    async fn cancel_booking(&self, booking_id: &str) -> SimResult<CancellationOutcome> {
        answer(ServiceKind::Travel, self.delay, &self.failure, cancelled(booking_id)).await
    }
}

#[derive(Default)]
pub struct StubHotel {
    pub hotels: Vec<Hotel>,
    pub delay: Duration,
    pub failure: Option<UnavailableCause>,
}

impl StubHotel {
    pub fn with_hotels(hotels: Vec<Hotel>) -> Self {
        Self { hotels, ..Default::default() }
    }

    pub fn failing(cause: UnavailableCause) -> Self {
        Self { failure: Some(cause), ..Default::default() }
    }
}

#[async_trait]
impl HotelSimulator for StubHotel {
    async fn cities(&self) -> SimResult<CitiesResponse> {
        answer(ServiceKind::Hotel, self.delay, &self.failure, CitiesResponse::default()).await
    }

    async fn search_hotels(&self, query: &HotelSearchQuery) -> SimResult<HotelSearchResponse> {
        let response = HotelSearchResponse {
            search_criteria: HotelSearchCriteria {
                city: query.city.clone(),
                check_in: query.check_in,
                check_out: query.check_out,
                guests: query.guests,
                rooms: query.rooms,
                nights: query.nights(),
            },
            count: self.hotels.len(),
            hotels: self.hotels.clone(),
        };
        answer(ServiceKind::Hotel, self.delay, &self.failure, response).await
    }

    async fn book_hotel(&self, request: &HotelBookingRequest) -> SimResult<HotelBookingConfirmation> {
        let confirmation = HotelBookingConfirmation {
            booking_reference: "HB100001".to_string(),
            status: "confirmed".to_string(),
            hotel_booking: HotelBookingDetail {
                hotel_id: request.hotel_id.clone(),
                room_id: request.room_id.clone(),
                booking_time: Utc::now(),
                guest_details: request.guest_details.clone(),
                check_in: request.check_in,
                check_out: request.check_out,
            },
            total_amount: request.total_price.unwrap_or(0.0),
            payment_status: "processed".to_string(),
            confirmation_email_sent: true,
            cancellation_policy: "Free cancellation".to_string(),
        };
        answer(ServiceKind::Hotel, self.delay, &self.failure, confirmation).await
    }

    async fn booking(&self, reference: &str) -> SimResult<HotelBookingRecord> {
        let today = Utc::now().date_naive();
        let record = HotelBookingRecord {
            booking_reference: reference.to_string(),
            status: "confirmed".to_string(),
            guest_count: 2,
            total_amount: 300.0,
            booking_date: Utc::now(),
            check_in: today,
            check_out: today + chrono::Duration::days(2),
            nights: 2,
        };
        answer(ServiceKind::Hotel, self.delay, &self.failure, record).await
    }

    async fn cancel_booking(&self, booking_id: &str) -> SimResult<CancellationOutcome> {
        answer(ServiceKind::Hotel, self.delay, &self.failure, cancelled(booking_id)).await
    }
}

#[derive(Default)]
pub struct StubShopping {
    pub products: Vec<Product>,
    pub failure: Option<UnavailableCause>,
}

#[async_trait]
impl ShoppingSimulator for StubShopping {
    async fn categories(&self) -> SimResult<CategoriesResponse> {
        answer(ServiceKind::Shopping, Duration::ZERO, &self.failure, CategoriesResponse::default()).await
    }

    async fn brands(&self, _category: Option<&str>) -> SimResult<BrandsResponse> {
        answer(ServiceKind::Shopping, Duration::ZERO, &self.failure, BrandsResponse::default()).await
    }

    async fn search_products(&self, query: &ProductSearchQuery) -> SimResult<ProductSearchResponse> {
        let response = ProductSearchResponse {
            search_criteria: ProductSearchCriteria {
                category: query.category.clone().unwrap_or_default(),
                query: query.q.clone().unwrap_or_default(),
                min_price: query.min_price.unwrap_or(0.0),
                max_price: query.max_price.unwrap_or(10000.0),
                brand: query.brand.clone().unwrap_or_default(),
                sort_by: query.sort.as_str().to_string(),
            },
            total_count: self.products.len(),
            has_more: false,
            products: self.products.clone(),
        };
        answer(ServiceKind::Shopping, Duration::ZERO, &self.failure, response).await
    }

    async fn product(&self, _product_id: &str) -> SimResult<ProductDetails> {
        Err(SimulatorError::unavailable(
            ServiceKind::Shopping,
            UnavailableCause::Status { code: 404, message: "Product not found".to_string() },
        ))
    }

    async fn add_to_cart(&self, request: &CartAddRequest) -> SimResult<CartItem> {
        let item = CartItem {
            cart_item_id: "cart-1".to_string(),
            product_id: request.product_id.clone(),
            quantity: request.quantity,
            added_at: Utc::now(),
            status: "added".to_string(),
        };
        answer(ServiceKind::Shopping, Duration::ZERO, &self.failure, item).await
    }

    async fn create_order(&self, _request: &OrderRequest) -> SimResult<OrderConfirmation> {
        Err(SimulatorError::unavailable(ServiceKind::Shopping, UnavailableCause::Timeout))
    }

    async fn order(&self, _order_id: &str) -> SimResult<OrderStatus> {
        Err(SimulatorError::unavailable(ServiceKind::Shopping, UnavailableCause::Timeout))
    }

    async fn cancel_order(&self, order_id: &str) -> SimResult<CancellationOutcome> {
        answer(ServiceKind::Shopping, Duration::ZERO, &self.failure, cancelled(order_id)).await
    }
}
