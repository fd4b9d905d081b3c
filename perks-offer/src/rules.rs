use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discount::DiscountOutcome;
use crate::models::Offer;

/// The offer that produced a discounted price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedOffer {
    pub offer_id: Uuid,
    pub title: String,
    pub discount_percentage: f64,
    pub max_discount_amount: Option<f64>,
}

impl From<&Offer> for AppliedOffer {
    fn from(offer: &Offer) -> Self {
        Self {
            offer_id: offer.id,
            title: offer.title.clone(),
            discount_percentage: offer.discount_percentage,
            max_discount_amount: offer.max_discount_amount,
        }
    }
}

/// Price of one item after the best eligible offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub base_price: f64,
    pub discount_applied: f64,
    pub final_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<AppliedOffer>,
}

impl Pricing {
    fn undiscounted(base_price: f64) -> Self {
        let outcome = crate::discount::apply_discount(base_price, 0.0, None);
        Self::from_outcome(outcome, None)
    }

    fn from_outcome(outcome: DiscountOutcome, offer: Option<AppliedOffer>) -> Self {
        Self {
            base_price: outcome.base_price,
            discount_applied: outcome.discount,
            final_price: outcome.final_price,
            offer,
        }
    }
}

/// Picks, per price, the eligible offer that saves the customer the most.
///
/// Ties go to the offer created first, then to the lowest id, so the same
/// inputs always price the same way.
#[derive(Debug, Clone, Default)]
pub struct DiscountRules {
    offers: Vec<Offer>,
}

impl DiscountRules {
    pub fn new(mut offers: Vec<Offer>) -> Self {
        offers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Self { offers }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn price(&self, base_price: f64) -> Pricing {
        let mut best: Option<(&Offer, DiscountOutcome)> = None;
        for offer in &self.offers {
            let outcome = offer.discount_for(base_price);
            let better = match &best {
                Some((_, current)) => outcome.discount > current.discount,
                None => true,
            };
            if better {
                best = Some((offer, outcome));
            }
        }

        match best {
            Some((offer, outcome)) if outcome.discount > 0.0 => {
                Pricing::from_outcome(outcome, Some(AppliedOffer::from(offer)))
            }
            _ => Pricing::undiscounted(base_price),
        }
    }
}
