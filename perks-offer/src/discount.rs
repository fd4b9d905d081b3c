use perks_shared::money::round_cents;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountOutcome {
    pub base_price: f64,
    pub discount: f64,
    pub final_price: f64,
}

/// Applies a percentage discount, optionally capped at an absolute amount.
///
/// `final_price = max(0, base - min(base * pct / 100, cap))`, rounded to cents.
/// Out-of-range inputs are clamped: negative or non-finite prices count as zero,
/// percentages are held to [0, 100] and a negative cap is ignored.
pub fn apply_discount(base_price: f64, discount_pct: f64, cap: Option<f64>) -> DiscountOutcome {
    let base = if base_price.is_finite() { base_price.max(0.0) } else { 0.0 };
    let pct = if discount_pct.is_finite() { discount_pct.clamp(0.0, 100.0) } else { 0.0 };

    let mut discount = base * pct / 100.0;
    if let Some(cap) = cap.filter(|c| c.is_finite() && *c >= 0.0) {
        discount = discount.min(cap);
    }

    let final_price = round_cents((base - discount).max(0.0));
    DiscountOutcome {
        base_price: round_cents(base),
        discount: round_cents(discount),
        final_price,
    }
}
