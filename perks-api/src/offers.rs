use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use perks_offer::{CustomerOffer, NewOffer, Offer, OfferFilter, OfferStatus};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub customer_id: String,
}

#[derive(Debug, Serialize)]
pub struct OfferView {
    #[serde(flatten)]
    pub offer: Offer,
    pub status: OfferStatus,
}

impl OfferView {
    fn now(offer: Offer) -> Self {
        let status = offer.status_at(Utc::now());
        Self { offer, status }
    }
}

#[derive(Debug, Serialize)]
pub struct OfferList {
    pub offers: Vec<OfferView>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CustomerOffers {
    pub customer_id: String,
    pub activations: Vec<CustomerOffer>,
    pub total_savings: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_offer).get(list_offers))
        .route("/{id}", get(get_offer))
        .route("/{id}/activate", post(activate_offer))
        .route("/{id}/deactivate", post(deactivate_offer))
        .route("/{id}/reactivate", post(reactivate_offer))
        .route("/{id}/expire", post(expire_offer))
        .route("/customers/{customer_id}", get(customer_offers))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/offers
async fn create_offer(
    State(state): State<AppState>,
    payload: Result<Json<NewOffer>, JsonRejection>,
) -> Result<(StatusCode, Json<OfferView>), AppError> {
    let Json(draft) = payload?;
    let offer = state.offers.create_offer(draft, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(OfferView::now(offer))))
}

/// GET /api/offers?category=TRAVEL&active_only=true
async fn list_offers(
    State(state): State<AppState>,
    Query(filter): Query<OfferFilter>,
) -> Result<Json<OfferList>, AppError> {
    let offers: Vec<OfferView> = state
        .offers
        .list_offers(&filter, Utc::now())
        .await?
        .into_iter()
        .map(OfferView::now)
        .collect();
    Ok(Json(OfferList {
        count: offers.len(),
        offers,
    }))
}

async fn get_offer(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<OfferView>, AppError> {
    Ok(Json(OfferView::now(state.offers.get_offer(id).await?)))
}

/// POST /api/offers/{id}/activate
/// 201 for a first activation, 200 when an earlier one is switched back on.
async fn activate_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ActivateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerOffer>), AppError> {
    let Json(req) = payload?;
    let (activation, created) = state.offers.activate(id, &req.customer_id, Utc::now()).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(activation)))
}

async fn deactivate_offer(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<OfferView>, AppError> {
    Ok(Json(OfferView::now(state.offers.deactivate(id).await?)))
}

async fn reactivate_offer(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<OfferView>, AppError> {
    Ok(Json(OfferView::now(state.offers.reactivate(id, Utc::now()).await?)))
}

async fn expire_offer(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<OfferView>, AppError> {
    Ok(Json(OfferView::now(state.offers.expire(id, Utc::now()).await?)))
}

async fn customer_offers(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomerOffers>, AppError> {
    let activations = state.offers.customer_activations(&customer_id).await?;
    let total_savings = perks_shared::money::round_cents(activations.iter().map(|a| a.total_savings).sum());
    Ok(Json(CustomerOffers {
        customer_id,
        activations,
        total_savings,
    }))
}
