use async_trait::async_trait;
use perks_core::CoreResult;
use uuid::Uuid;

use crate::models::{CustomerOffer, Offer};

/// Storage for offers and per-customer activations.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Insert or replace an offer.
    async fn save_offer(&self, offer: &Offer) -> CoreResult<()>;

    async fn get_offer(&self, id: Uuid) -> CoreResult<Option<Offer>>;

    async fn list_offers(&self) -> CoreResult<Vec<Offer>>;

    /// Insert or replace the activation keyed by (customer_id, offer_id).
    async fn save_activation(&self, activation: &CustomerOffer) -> CoreResult<()>;

    async fn get_activation(&self, customer_id: &str, offer_id: Uuid) -> CoreResult<Option<CustomerOffer>>;

    async fn list_activations(&self, customer_id: &str) -> CoreResult<Vec<CustomerOffer>>;
}
