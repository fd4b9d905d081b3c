use async_trait::async_trait;
use perks_core::CoreResult;
use perks_offer::{CustomerOffer, Offer, OfferRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local offer storage. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryOfferRepository {
    offers: RwLock<HashMap<Uuid, Offer>>,
    activations: RwLock<HashMap<(String, Uuid), CustomerOffer>>,
}

impl InMemoryOfferRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn save_offer(&self, offer: &Offer) -> CoreResult<()> {
        self.offers.write().await.insert(offer.id, offer.clone());
        Ok(())
    }

    async fn get_offer(&self, id: Uuid) -> CoreResult<Option<Offer>> {
        Ok(self.offers.read().await.get(&id).cloned())
    }

    async fn list_offers(&self) -> CoreResult<Vec<Offer>> {
        Ok(self.offers.read().await.values().cloned().collect())
    }

    async fn save_activation(&self, activation: &CustomerOffer) -> CoreResult<()> {
        let key = (activation.customer_id.clone(), activation.offer_id);
        self.activations.write().await.insert(key, activation.clone());
        Ok(())
    }

    async fn get_activation(&self, customer_id: &str, offer_id: Uuid) -> CoreResult<Option<CustomerOffer>> {
        let key = (customer_id.to_string(), offer_id);
        Ok(self.activations.read().await.get(&key).cloned())
    }

    async fn list_activations(&self, customer_id: &str) -> CoreResult<Vec<CustomerOffer>> {
        Ok(self
            .activations
            .read()
            .await
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect())
    }
}
