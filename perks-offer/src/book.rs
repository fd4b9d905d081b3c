use chrono::{DateTime, Utc};
use perks_core::{CoreError, CoreResult};
use perks_shared::money::round_cents;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::models::{CustomerOffer, NewOffer, Offer, OfferCategory, OfferStatus};
use crate::repository::OfferRepository;
use crate::rules::DiscountRules;

/// Quoted savings may differ from the offer's own figure by rounding.
const SAVINGS_TOLERANCE: f64 = 0.005;

/// One use of an offer against a purchase.
#[derive(Debug, Clone)]
pub struct UsageClaim<'a> {
    pub customer_id: &'a str,
    pub offer_id: Uuid,
    pub category: OfferCategory,
    /// Purchase price before the discount.
    pub base_price: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferFilter {
    pub category: Option<OfferCategory>,
    #[serde(default)]
    pub active_only: bool,
}

/// Offer lifecycle and customer activations on top of an [`OfferRepository`].
///
/// Mutations are serialized through `write_lock` so read-modify-write sequences
/// (activation, usage counting) cannot interleave.
#[derive(Clone)]
pub struct OfferBook {
    repo: Arc<dyn OfferRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl OfferBook {
    pub fn new(repo: Arc<dyn OfferRepository>) -> Self {
        Self {
            repo,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn create_offer(&self, draft: NewOffer, now: DateTime<Utc>) -> CoreResult<Offer> {
        let offer = Offer::create(draft, now)?;
        self.repo.save_offer(&offer).await?;
        info!("Offer {} created ({:?}, {}%)", offer.id, offer.category, offer.discount_percentage);
        Ok(offer)
    }

    pub async fn get_offer(&self, id: Uuid) -> CoreResult<Offer> {
        self.repo
            .get_offer(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("offer {}", id)))
    }

    /// Offers ordered by creation time.
    pub async fn list_offers(&self, filter: &OfferFilter, now: DateTime<Utc>) -> CoreResult<Vec<Offer>> {
        let mut offers: Vec<Offer> = self
            .repo
            .list_offers()
            .await?
            .into_iter()
            .filter(|o| filter.category.map_or(true, |c| o.category == c))
            .filter(|o| !filter.active_only || o.is_live_at(now))
            .collect();
        offers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(offers)
    }

    /// Activates an offer for a customer.
    ///
    /// Returns the activation and whether it was newly created. An inactive
    /// earlier activation is switched back on; an active one is a conflict.
    pub async fn activate(
        &self,
        offer_id: Uuid,
        customer_id: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<(CustomerOffer, bool)> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(CoreError::validation("customer_id", "is required"));
        }

        let _guard = self.write_lock.lock().await;
        let offer = self.get_offer(offer_id).await?;
        match offer.status_at(now) {
            OfferStatus::Active => {}
            OfferStatus::Inactive => return Err(CoreError::validation("offer_id", "offer is not active")),
            OfferStatus::Scheduled => return Err(CoreError::validation("offer_id", "offer has not started yet")),
            OfferStatus::Expired => return Err(CoreError::validation("offer_id", "offer has expired")),
        }

        match self.repo.get_activation(customer_id, offer_id).await? {
            Some(existing) if existing.is_active => Err(CoreError::Conflict(format!(
                "offer {} already activated for customer {}",
                offer_id, customer_id
            ))),
            Some(mut existing) => {
                existing.is_active = true;
                existing.activation_date = now;
                self.repo.save_activation(&existing).await?;
                info!("Offer {} reactivated for customer {}", offer_id, customer_id);
                Ok((existing, false))
            }
            None => {
                let activation = CustomerOffer::new(customer_id, offer_id, now);
                self.repo.save_activation(&activation).await?;
                info!("Offer {} activated for customer {}", offer_id, customer_id);
                Ok((activation, true))
            }
        }
    }

    pub async fn deactivate(&self, offer_id: Uuid) -> CoreResult<Offer> {
        let _guard = self.write_lock.lock().await;
        let mut offer = self.get_offer(offer_id).await?;
        if !offer.is_active {
            return Err(CoreError::Conflict(format!("offer {} is already inactive", offer_id)));
        }
        offer.is_active = false;
        self.repo.save_offer(&offer).await?;
        info!("Offer {} deactivated", offer_id);
        Ok(offer)
    }

    pub async fn reactivate(&self, offer_id: Uuid, now: DateTime<Utc>) -> CoreResult<Offer> {
        let _guard = self.write_lock.lock().await;
        let mut offer = self.get_offer(offer_id).await?;
        if offer.is_active {
            return Err(CoreError::Conflict(format!("offer {} is already active", offer_id)));
        }
        if now >= offer.expiry_date {
            return Err(CoreError::validation("offer_id", "cannot reactivate an expired offer"));
        }
        offer.is_active = true;
        self.repo.save_offer(&offer).await?;
        info!("Offer {} reactivated", offer_id);
        Ok(offer)
    }

    /// Ends the offer window now and switches the offer off.
    pub async fn expire(&self, offer_id: Uuid, now: DateTime<Utc>) -> CoreResult<Offer> {
        let _guard = self.write_lock.lock().await;
        let mut offer = self.get_offer(offer_id).await?;
        if offer.expiry_date <= now {
            return Err(CoreError::Conflict(format!("offer {} is already expired", offer_id)));
        }
        offer.expiry_date = now;
        offer.is_active = false;
        self.repo.save_offer(&offer).await?;
        info!("Offer {} expired", offer_id);
        Ok(offer)
    }

    pub async fn customer_activations(&self, customer_id: &str) -> CoreResult<Vec<CustomerOffer>> {
        let mut activations = self.repo.list_activations(customer_id).await?;
        activations.sort_by(|a, b| a.activation_date.cmp(&b.activation_date).then_with(|| a.offer_id.cmp(&b.offer_id)));
        Ok(activations)
    }

    /// Live offers in `category` the customer has activated and not used up.
    pub async fn eligible_offers(
        &self,
        customer_id: &str,
        category: OfferCategory,
        now: DateTime<Utc>,
    ) -> CoreResult<Vec<Offer>> {
        let mut eligible = Vec::new();
        for activation in self.repo.list_activations(customer_id).await? {
            if !activation.is_active {
                continue;
            }
            let Some(offer) = self.repo.get_offer(activation.offer_id).await? else {
                continue;
            };
            if offer.category == category && offer.is_live_at(now) && activation.has_uses_left(&offer) {
                eligible.push(offer);
            }
        }
        Ok(eligible)
    }

    /// Discount rules for a customer; an anonymous caller gets none.
    pub async fn rules_for(
        &self,
        customer_id: Option<&str>,
        category: OfferCategory,
        now: DateTime<Utc>,
    ) -> CoreResult<DiscountRules> {
        match customer_id.map(str::trim).filter(|c| !c.is_empty()) {
            Some(customer_id) => Ok(DiscountRules::new(self.eligible_offers(customer_id, category, now).await?)),
            None => Ok(DiscountRules::none()),
        }
    }

    /// Counts one use of an activated offer before the purchase goes out.
    ///
    /// Eligibility, the saving bound and the increment happen under one lock,
    /// so two purchases can never both take an offer's last use. Call
    /// [`OfferBook::release_usage`] if the purchase then fails.
    pub async fn reserve_usage(&self, claim: &UsageClaim<'_>, now: DateTime<Utc>) -> CoreResult<CustomerOffer> {
        if !claim.savings.is_finite() || claim.savings < 0.0 {
            return Err(CoreError::validation("discount_applied", "must be a non-negative amount"));
        }
        if !claim.base_price.is_finite() || claim.base_price < 0.0 {
            return Err(CoreError::validation("total_price", "must be a non-negative amount"));
        }
        let unavailable = || {
            CoreError::validation(
                "offer_id",
                format!("offer {} is not available to customer {}", claim.offer_id, claim.customer_id),
            )
        };

        let _guard = self.write_lock.lock().await;
        let offer = self
            .repo
            .get_offer(claim.offer_id)
            .await?
            .filter(|o| o.category == claim.category && o.is_live_at(now))
            .ok_or_else(unavailable)?;
        let mut activation = self
            .repo
            .get_activation(claim.customer_id, claim.offer_id)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(unavailable)?;
        if !activation.has_uses_left(&offer) {
            return Err(CoreError::validation(
                "offer_id",
                format!(
                    "offer {} already used {} time(s) by customer {}",
                    claim.offer_id, activation.usage_count, claim.customer_id
                ),
            ));
        }

        let allowed = offer.discount_for(claim.base_price).discount;
        if claim.savings > allowed + SAVINGS_TOLERANCE {
            return Err(CoreError::validation(
                "discount_applied",
                format!("{:.2} exceeds the {:.2} this offer gives on {:.2}", claim.savings, allowed, claim.base_price),
            ));
        }

        activation.usage_count += 1;
        activation.total_savings = round_cents(activation.total_savings + claim.savings);
        self.repo.save_activation(&activation).await?;
        info!(
            "Offer {} reserved for customer {} ({} of {})",
            claim.offer_id, claim.customer_id, activation.usage_count, offer.max_usage_per_customer
        );
        Ok(activation)
    }

    /// Gives back a use taken by [`OfferBook::reserve_usage`].
    pub async fn release_usage(&self, customer_id: &str, offer_id: Uuid, savings: f64) -> CoreResult<CustomerOffer> {
        let _guard = self.write_lock.lock().await;
        let mut activation = self
            .repo
            .get_activation(customer_id, offer_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("offer {} for customer {}", offer_id, customer_id)))?;
        activation.usage_count = activation.usage_count.saturating_sub(1);
        activation.total_savings = round_cents((activation.total_savings - savings).max(0.0));
        self.repo.save_activation(&activation).await?;
        info!("Offer {} released for customer {}", offer_id, customer_id);
        Ok(activation)
    }
}
