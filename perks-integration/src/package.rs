//! Flight + hotel bundles.

use chrono::NaiveDate;
use perks_offer::{DiscountRules, Pricing};
use perks_shared::models::hotel::{Hotel, HotelSearchResponse, Room};
use perks_shared::models::travel::Flight;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Cheapest options taken from each leg.
pub const LEG_CANDIDATES: usize = 3;
pub const MAX_PACKAGES: usize = 6;

/// The hotel half of a package: the hotel and its cheapest room for the stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageHotel {
    pub hotel_id: String,
    pub name: String,
    pub star_rating: u8,
    pub rating: f64,
    pub min_price: f64,
    pub room: Option<Room>,
}

impl From<&Hotel> for PackageHotel {
    fn from(hotel: &Hotel) -> Self {
        Self {
            hotel_id: hotel.hotel_id.clone(),
            name: hotel.name.clone(),
            star_rating: hotel.star_rating,
            rating: hotel.rating,
            min_price: hotel.min_price,
            room: hotel
                .available_rooms
                .iter()
                .min_by(|a, b| a.total_price.total_cmp(&b.total_price))
                .cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPackage {
    pub package_id: String,
    pub flight: Flight,
    pub hotel: PackageHotel,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    #[serde(flatten)]
    pub pricing: Pricing,
}

fn cheapest<T: Clone>(items: &[T], price: impl Fn(&T) -> f64) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| price(a).total_cmp(&price(b)));
    sorted.truncate(LEG_CANDIDATES);
    sorted
}

fn package_order(a: &TravelPackage, b: &TravelPackage) -> Ordering {
    a.pricing
        .final_price
        .total_cmp(&b.pricing.final_price)
        .then_with(|| a.pricing.base_price.total_cmp(&b.pricing.base_price))
        .then_with(|| a.flight.flight_id.cmp(&b.flight.flight_id))
        .then_with(|| a.hotel.hotel_id.cmp(&b.hotel.hotel_id))
}

/// Pairs the cheapest flights departing on the check-in date with the
/// cheapest hotels, priced with `rules`, cheapest first.
pub fn build_packages(flights: &[Flight], hotels: &HotelSearchResponse, rules: &DiscountRules) -> Vec<TravelPackage> {
    let stay = &hotels.search_criteria;
    let same_day: Vec<Flight> = flights
        .iter()
        .filter(|flight| flight.departure.date == stay.check_in)
        .cloned()
        .collect();
    let top_flights = cheapest(&same_day, |f| f.total_price);
    let top_hotels = cheapest(&hotels.hotels, |h| h.min_price);

    let mut packages: Vec<TravelPackage> = top_flights
        .iter()
        .flat_map(|flight| {
            top_hotels.iter().map(move |hotel| {
                let base_price = flight.total_price + hotel.min_price;
                TravelPackage {
                    package_id: format!("pkg_{}_{}", flight.flight_id, hotel.hotel_id),
                    flight: flight.clone(),
                    hotel: PackageHotel::from(hotel),
                    check_in: stay.check_in,
                    check_out: stay.check_out,
                    nights: stay.nights,
                    pricing: rules.price(base_price),
                }
            })
        })
        .collect();

    packages.sort_by(package_order);
    packages.truncate(MAX_PACKAGES);
    packages
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_top_three_by_three_keeps_six_cheapest() {
        let flights: Vec<Flight> = [500.0, 100.0, 300.0, 200.0, 400.0]
            .iter()
            .enumerate()
            .map(|(i, p)| flight(&format!("f{}", i), *p, 1, "2026-12-20"))
            .collect();
        let hotels = hotel_response(
            "2026-12-20",
            "2026-12-23",
            vec![hotel("h1", 90.0), hotel("h2", 30.0), hotel("h3", 60.0), hotel("h4", 10.0)],
        );

        let packages = build_packages(&flights, &hotels, &DiscountRules::none());
        assert_eq!(packages.len(), MAX_PACKAGES);
        // flights 100/200/300 with hotels 10/30/60
        let prices: Vec<f64> = packages.iter().map(|p| p.pricing.final_price).collect();
        assert_eq!(prices, vec![110.0, 130.0, 160.0, 210.0, 230.0, 260.0]);
        assert!(packages.iter().all(|p| p.flight.flight_id != "f0" && p.hotel.hotel_id != "h1"));
        assert_eq!(packages[0].nights, 3);
        assert_eq!(packages[0].hotel.room.as_ref().unwrap().total_price, 10.0);
    }

    #[test]
    fn test_only_matching_dates_pair() {
        let flights = vec![flight("early", 100.0, 1, "2026-12-19"), flight("on-time", 300.0, 1, "2026-12-20")];
        let hotels = hotel_response("2026-12-20", "2026-12-23", vec![hotel("h1", 50.0)]);

        let packages = build_packages(&flights, &hotels, &DiscountRules::none());
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].flight.flight_id, "on-time");
        assert_eq!(packages[0].package_id, "pkg_on-time_h1");
    }

    #[test]
    fn test_cheaper_flights_on_other_days_do_not_crowd_out_the_trip_date() {
        let flights = vec![
            flight("d1", 50.0, 1, "2026-12-18"),
            flight("d2", 60.0, 1, "2026-12-19"),
            flight("d3", 70.0, 1, "2026-12-21"),
            flight("on-time", 400.0, 1, "2026-12-20"),
        ];
        let hotels = hotel_response("2026-12-20", "2026-12-23", vec![hotel("h1", 50.0)]);

        let packages = build_packages(&flights, &hotels, &DiscountRules::none());
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].package_id, "pkg_on-time_h1");
    }

    #[test]
    fn test_ties_break_on_ids() {
        let flights = vec![flight("fb", 100.0, 1, "2026-12-20"), flight("fa", 100.0, 1, "2026-12-20")];
        let hotels = hotel_response("2026-12-20", "2026-12-21", vec![hotel("hb", 50.0), hotel("ha", 50.0)]);

        let ids: Vec<String> = build_packages(&flights, &hotels, &DiscountRules::none())
            .into_iter()
            .map(|p| p.package_id)
            .collect();
        assert_eq!(ids, vec!["pkg_fa_ha", "pkg_fa_hb", "pkg_fb_ha", "pkg_fb_hb"]);
    }

    #[test]
    fn test_empty_leg_gives_no_packages() {
        let flights = vec![flight("f1", 100.0, 1, "2026-12-20")];
        let hotels = hotel_response("2026-12-20", "2026-12-21", Vec::new());
        assert!(build_packages(&flights, &hotels, &DiscountRules::none()).is_empty());
    }
}
