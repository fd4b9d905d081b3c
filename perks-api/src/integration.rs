use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use perks_core::search::{FlightSearchParams, HotelSearchParams, PackageSearchParams, ProductSearchParams};
use perks_integration::response::{FlightResults, HotelResults, PackageResults, ProductResults};
use perks_integration::{BookingReceipt, OfferBooking, ServiceResponse};
use perks_shared::models::hotel::{
    CitiesResponse, HotelBookingConfirmation, HotelBookingRecord, HotelBookingRequest,
};
use perks_shared::models::shopping::{
    BrandsResponse, CartAddRequest, CartItem, CategoriesResponse, OrderConfirmation, OrderRequest, OrderStatus,
    ProductDetails,
};
use perks_shared::models::status::StatusReport;
use perks_shared::models::travel::{
    AirportsResponse, FlightBookingConfirmation, FlightBookingRecord, FlightBookingRequest,
};
use perks_shared::models::CancellationOutcome;

use crate::error::AppError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

#[derive(Debug, Default, Deserialize)]
pub struct BrandFilter {
    pub category: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/simulator/status", get(simulator_status))
        .route("/offers/travel/airports", get(airports))
        .route("/offers/travel/search-flights", get(search_flights))
        .route("/offers/travel/book-flight", post(book_flight))
        .route("/offers/travel/booking/{reference}", get(flight_booking))
        .route("/offers/travel/cancel/{booking_id}", post(cancel_flight))
        .route("/offers/hotel/cities", get(cities))
        .route("/offers/hotel/search-hotels", get(search_hotels))
        .route("/offers/hotel/book-hotel", post(book_hotel))
        .route("/offers/hotel/booking/{reference}", get(hotel_booking))
        .route("/offers/hotel/cancel/{booking_id}", post(cancel_hotel))
        .route("/offers/shopping/categories", get(categories))
        .route("/offers/shopping/brands", get(brands))
        .route("/offers/shopping/search", get(search_products))
        .route("/offers/shopping/product/{product_id}", get(product))
        .route("/offers/shopping/add-to-cart", post(add_to_cart))
        .route("/offers/shopping/create-order", post(create_order))
        .route("/offers/shopping/order/{order_id}", get(order))
        .route("/offers/shopping/cancel/{order_id}", post(cancel_order))
        .route("/offers/search/travel-package", get(search_packages))
}

async fn simulator_status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.monitor.check().await)
}

// ============================================================================
// Travel
// ============================================================================

async fn airports(State(state): State<AppState>) -> ApiResult<ServiceResponse<AirportsResponse>> {
    Ok(Json(state.aggregator.airports().await?))
}

async fn search_flights(
    State(state): State<AppState>,
    Query(params): Query<FlightSearchParams>,
) -> ApiResult<ServiceResponse<FlightResults>> {
    Ok(Json(state.aggregator.search_flights(&params, Utc::now()).await?))
}

async fn book_flight(
    State(state): State<AppState>,
    payload: Result<Json<OfferBooking<FlightBookingRequest>>, JsonRejection>,
) -> ApiResult<BookingReceipt<FlightBookingConfirmation>> {
    let Json(booking) = payload?;
    Ok(Json(state.aggregator.book_flight(booking, Utc::now()).await?))
}

async fn flight_booking(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<FlightBookingRecord> {
    Ok(Json(state.aggregator.flight_booking(&reference).await?))
}

async fn cancel_flight(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> ApiResult<CancellationOutcome> {
    Ok(Json(state.aggregator.cancel_flight(&booking_id).await?))
}

// ============================================================================
// Hotel
// ============================================================================

async fn cities(State(state): State<AppState>) -> ApiResult<ServiceResponse<CitiesResponse>> {
    Ok(Json(state.aggregator.cities().await?))
}

async fn search_hotels(
    State(state): State<AppState>,
    Query(params): Query<HotelSearchParams>,
) -> ApiResult<ServiceResponse<HotelResults>> {
    Ok(Json(state.aggregator.search_hotels(&params, Utc::now()).await?))
}

async fn book_hotel(
    State(state): State<AppState>,
    payload: Result<Json<OfferBooking<HotelBookingRequest>>, JsonRejection>,
) -> ApiResult<BookingReceipt<HotelBookingConfirmation>> {
    let Json(booking) = payload?;
    Ok(Json(state.aggregator.book_hotel(booking, Utc::now()).await?))
}

async fn hotel_booking(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<HotelBookingRecord> {
    Ok(Json(state.aggregator.hotel_booking(&reference).await?))
}

async fn cancel_hotel(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> ApiResult<CancellationOutcome> {
    Ok(Json(state.aggregator.cancel_hotel(&booking_id).await?))
}

// ============================================================================
// Shopping
// ============================================================================

async fn categories(State(state): State<AppState>) -> ApiResult<ServiceResponse<CategoriesResponse>> {
    Ok(Json(state.aggregator.categories().await?))
}

async fn brands(
    State(state): State<AppState>,
    Query(filter): Query<BrandFilter>,
) -> ApiResult<ServiceResponse<BrandsResponse>> {
    Ok(Json(state.aggregator.brands(filter.category.as_deref()).await?))
}

async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<ProductSearchParams>,
) -> ApiResult<ServiceResponse<ProductResults>> {
    Ok(Json(state.aggregator.search_products(&params, Utc::now()).await?))
}

async fn product(State(state): State<AppState>, Path(product_id): Path<String>) -> ApiResult<ProductDetails> {
    Ok(Json(state.aggregator.product(&product_id).await?))
}

async fn add_to_cart(
    State(state): State<AppState>,
    payload: Result<Json<CartAddRequest>, JsonRejection>,
) -> ApiResult<CartItem> {
    let Json(request) = payload?;
    Ok(Json(state.aggregator.add_to_cart(&request).await?))
}

async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<OfferBooking<OrderRequest>>, JsonRejection>,
) -> ApiResult<BookingReceipt<OrderConfirmation>> {
    let Json(booking) = payload?;
    Ok(Json(state.aggregator.create_order(booking, Utc::now()).await?))
}

async fn order(State(state): State<AppState>, Path(order_id): Path<String>) -> ApiResult<OrderStatus> {
    Ok(Json(state.aggregator.order(&order_id).await?))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ApiResult<CancellationOutcome> {
    Ok(Json(state.aggregator.cancel_order(&order_id).await?))
}

// ============================================================================
// Packages
// ============================================================================

async fn search_packages(
    State(state): State<AppState>,
    Query(params): Query<PackageSearchParams>,
) -> ApiResult<PackageResults> {
    Ok(Json(state.aggregator.search_packages(&params, Utc::now()).await?))
}
