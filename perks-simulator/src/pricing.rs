//! Price generation for the simulated partners.
//!
//! Every function takes its random source and "today" explicitly, so the
//! handlers use `thread_rng()` and the wall clock while tests can pin both.

use chrono::{Datelike, NaiveDate, Weekday};
use perks_shared::models::shopping::{OrderLine, OrderTotals, ShippingOption};
use perks_shared::money::round_cents;
use rand::seq::SliceRandom;
use rand::Rng;

pub const SALES_TAX_RATE: f64 = 0.08;
pub const DEFAULT_SHIPPING_COST: f64 = 9.99;
pub const FREE_SHIPPING_THRESHOLD: f64 = 50.0;

/// Late bookings cost more.
pub fn flight_date_multiplier(days_ahead: i64) -> f64 {
    if days_ahead < 7 {
        1.5
    } else if days_ahead < 14 {
        1.2
    } else {
        1.0
    }
}

/// Per-person fare: base 200..=800, distance factor 1.0..=2.5, date factor, 1.8 for a round trip.
pub fn flight_fare<R: Rng + ?Sized>(rng: &mut R, days_ahead: i64, round_trip: bool) -> f64 {
    let base = rng.gen_range(200..=800) as f64;
    let distance = rng.gen_range(1.0..=2.5);
    let trip = if round_trip { 1.8 } else { 1.0 };
    round_cents(base * distance * flight_date_multiplier(days_ahead) * trip)
}

pub fn season_multiplier(month: u32) -> f64 {
    match month {
        12 | 1 | 6 | 7 | 8 => 1.4,
        3 | 4 | 5 | 9 | 10 => 1.1,
        _ => 0.9,
    }
}

pub fn weekend_multiplier(day: Weekday) -> f64 {
    match day {
        Weekday::Sat | Weekday::Sun => 1.2,
        _ => 1.0,
    }
}

/// Early bookings are cheaper, last-minute ones dearer.
pub fn advance_multiplier(days_ahead: i64) -> f64 {
    if days_ahead > 30 {
        0.9
    } else if days_ahead < 7 {
        1.3
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StayRate {
    pub nightly_rate: f64,
    /// nightly_rate × nights × rooms
    pub total_price: f64,
}

pub fn stay_rate(
    base_price: f64,
    room_multiplier: f64,
    check_in: NaiveDate,
    nights: i64,
    rooms: u32,
    today: NaiveDate,
) -> StayRate {
    let days_ahead = (check_in - today).num_days();
    let nightly_rate = round_cents(
        base_price
            * room_multiplier
            * season_multiplier(check_in.month())
            * weekend_multiplier(check_in.weekday())
            * advance_multiplier(days_ahead),
    );
    StayRate {
        nightly_rate,
        total_price: round_cents(nightly_rate * nights.max(0) as f64 * rooms as f64),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductPrice {
    pub price: f64,
    pub original_price: f64,
    pub discount_percent: f64,
}

/// Shelf price around `base_price`; a discounted product is 10-30% under its list price.
pub fn product_price<R: Rng + ?Sized>(rng: &mut R, base_price: f64, premium: bool, discounted: bool) -> ProductPrice {
    let brand = if premium { 1.3 } else { rng.gen_range(0.8..=1.2) };
    let market = rng.gen_range(0.9..=1.15);
    // most products sit at their regular price
    let stock = *[1.0, 1.0, 1.0, 1.1, 0.95].choose(rng).unwrap_or(&1.0);
    let list_price = round_cents(base_price * brand * market * stock);

    if !discounted {
        return ProductPrice {
            price: list_price,
            original_price: list_price,
            discount_percent: 0.0,
        };
    }

    let cut = rng.gen_range(0.1..=0.3);
    let price = round_cents(list_price * (1.0 - cut));
    let discount_percent = if list_price > 0.0 {
        ((1.0 - price / list_price) * 1000.0).round() / 10.0
    } else {
        0.0
    };
    ProductPrice {
        price,
        original_price: list_price,
        discount_percent,
    }
}

pub fn shipping_options(price: f64) -> Vec<ShippingOption> {
    vec![
        ShippingOption {
            method: "standard".to_string(),
            name: "Standard Shipping".to_string(),
            cost: if price < FREE_SHIPPING_THRESHOLD { DEFAULT_SHIPPING_COST } else { 0.0 },
            delivery_days: "5-7 business days".to_string(),
            free_threshold: Some(FREE_SHIPPING_THRESHOLD),
        },
        ShippingOption {
            method: "express".to_string(),
            name: "Express Shipping".to_string(),
            cost: 19.99,
            delivery_days: "2-3 business days".to_string(),
            free_threshold: None,
        },
        ShippingOption {
            method: "overnight".to_string(),
            name: "Overnight Shipping".to_string(),
            cost: 39.99,
            delivery_days: "1 business day".to_string(),
            free_threshold: None,
        },
    ]
}

pub fn order_totals(items: Vec<OrderLine>, shipping_cost: f64) -> OrderTotals {
    let subtotal = round_cents(items.iter().map(|line| line.price * line.quantity as f64).sum());
    let shipping_cost = round_cents(shipping_cost);
    let tax = round_cents(subtotal * SALES_TAX_RATE);
    OrderTotals {
        items,
        subtotal,
        shipping_cost,
        tax,
        total: round_cents(subtotal + shipping_cost + tax),
        currency: "USD".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_flight_fare_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let one_way = flight_fare(&mut rng, 30, false);
            assert!((200.0..=2000.0).contains(&one_way), "one way fare {}", one_way);

            let late_round_trip = flight_fare(&mut rng, 3, true);
            assert!((540.0..=5400.0).contains(&late_round_trip), "round trip fare {}", late_round_trip);
        }
    }

    #[test]
    fn test_hotel_multipliers() {
        assert_eq!(season_multiplier(7), 1.4);
        assert_eq!(season_multiplier(4), 1.1);
        assert_eq!(season_multiplier(11), 0.9);
        assert_eq!(weekend_multiplier(Weekday::Sat), 1.2);
        assert_eq!(weekend_multiplier(Weekday::Wed), 1.0);
        assert_eq!(advance_multiplier(45), 0.9);
        assert_eq!(advance_multiplier(10), 1.0);
        assert_eq!(advance_multiplier(2), 1.3);
    }

    #[test]
    fn test_stay_rate_multiplies_nights_and_rooms() {
        // Wednesday in November, booked 34 days ahead: 200 × 0.9 × 0.9
        let rate = stay_rate(200.0, 1.0, date("2026-11-04"), 3, 2, date("2026-10-01"));
        assert_eq!(rate.nightly_rate, 162.0);
        assert_eq!(rate.total_price, 972.0);
    }

    #[test]
    fn test_discounted_product_is_below_list_price() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let p = product_price(&mut rng, 699.0, true, true);
            assert!(p.price < p.original_price);
            assert!((9.0..=31.0).contains(&p.discount_percent), "discount {}", p.discount_percent);

            let full = product_price(&mut rng, 49.0, false, false);
            assert_eq!(full.price, full.original_price);
            assert_eq!(full.discount_percent, 0.0);
        }
    }

    #[test]
    fn test_standard_shipping_free_over_threshold() {
        assert_eq!(shipping_options(49.99)[0].cost, DEFAULT_SHIPPING_COST);
        assert_eq!(shipping_options(50.0)[0].cost, 0.0);
    }

    #[test]
    fn test_order_totals_add_tax() {
        let items = vec![
            OrderLine { product_id: "a".to_string(), price: 100.0, quantity: 2 },
            OrderLine { product_id: "b".to_string(), price: 50.5, quantity: 1 },
        ];
        let totals = order_totals(items, DEFAULT_SHIPPING_COST);
        assert_eq!(totals.subtotal, 250.5);
        assert_eq!(totals.tax, 20.04);
        assert_eq!(totals.total, 280.53);
        assert_eq!(totals.currency, "USD");
    }
}
