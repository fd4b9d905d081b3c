use chrono::{DateTime, Utc};
use perks_core::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discount::{apply_discount, DiscountOutcome};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferCategory {
    Travel,
    Merchant,
    Cashback,
    Dining,
    Fuel,
    Shopping,
    Grocery,
    Entertainment,
    HealthWellness,
    Telecommunications,
    Utilities,
    Insurance,
    Education,
    Automotive,
    HomeGarden,
    Fashion,
    Electronics,
    Subscription,
    Finance,
    SportsFitness,
}

/// Lifecycle state derived from the active flag and the offer window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Scheduled,
    Active,
    Inactive,
    Expired,
}

/// A card-linked discount rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: OfferCategory,
    pub discount_percentage: f64,
    pub max_discount_amount: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub is_active: bool,
    pub max_usage_per_customer: u32,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an offer. `start_date` defaults to now.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOffer {
    pub title: String,
    pub description: Option<String>,
    pub category: OfferCategory,
    pub discount_percentage: f64,
    pub max_discount_amount: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub expiry_date: DateTime<Utc>,
    pub max_usage_per_customer: Option<u32>,
}

impl Offer {
    pub fn create(draft: NewOffer, now: DateTime<Utc>) -> CoreResult<Self> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::validation("title", "is required"));
        }
        if !draft.discount_percentage.is_finite()
            || draft.discount_percentage <= 0.0
            || draft.discount_percentage > 100.0
        {
            return Err(CoreError::validation("discount_percentage", "must be greater than 0 and at most 100"));
        }
        if let Some(cap) = draft.max_discount_amount {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(CoreError::validation("max_discount_amount", "must be positive"));
            }
        }
        let start_date = draft.start_date.unwrap_or(now);
        if draft.expiry_date <= start_date {
            return Err(CoreError::validation("expiry_date", "must be after start_date"));
        }
        let max_usage_per_customer = draft.max_usage_per_customer.unwrap_or(1);
        if max_usage_per_customer == 0 {
            return Err(CoreError::validation("max_usage_per_customer", "must be at least 1"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: draft.description,
            category: draft.category,
            discount_percentage: draft.discount_percentage,
            max_discount_amount: draft.max_discount_amount,
            start_date,
            expiry_date: draft.expiry_date,
            is_active: true,
            max_usage_per_customer,
            created_at: now,
        })
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> OfferStatus {
        if now >= self.expiry_date {
            OfferStatus::Expired
        } else if !self.is_active {
            OfferStatus::Inactive
        } else if now < self.start_date {
            OfferStatus::Scheduled
        } else {
            OfferStatus::Active
        }
    }

    /// Active flag set and `now` inside the offer window.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == OfferStatus::Active
    }

    pub fn discount_for(&self, base_price: f64) -> DiscountOutcome {
        apply_discount(base_price, self.discount_percentage, self.max_discount_amount)
    }
}

/// A customer's activation of an offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerOffer {
    pub customer_id: String,
    pub offer_id: Uuid,
    pub activation_date: DateTime<Utc>,
    pub usage_count: u32,
    pub total_savings: f64,
    pub is_active: bool,
}

impl CustomerOffer {
    pub fn new(customer_id: &str, offer_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            offer_id,
            activation_date: now,
            usage_count: 0,
            total_savings: 0.0,
            is_active: true,
        }
    }

    pub fn has_uses_left(&self, offer: &Offer) -> bool {
        self.usage_count < offer.max_usage_per_customer
    }
}
