//! Hotel booking partner.

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use perks_shared::models::hotel::{
    CitiesResponse, City, Hotel, HotelBookingConfirmation, HotelBookingDetail, HotelBookingRecord,
    HotelBookingRequest, HotelChain, HotelLocation, HotelSearchCriteria, HotelSearchResponse, Room,
};
use perks_shared::models::status::HealthReport;
use perks_shared::models::CancellationOutcome;
use perks_shared::ServiceKind;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::error::SimError;
use crate::pricing::stay_rate;
use crate::{cancellation_response, health_report, parse_count, parse_date};

const CHAINS: &[(&str, &str)] = &[
    ("marriott", "Marriott International"),
    ("hilton", "Hilton Hotels & Resorts"),
    ("hyatt", "Hyatt Hotels Corporation"),
    ("ihg", "InterContinental Hotels Group"),
    ("accor", "Accor Hotels"),
    ("wyndham", "Wyndham Hotels & Resorts"),
];

struct CityData {
    code: &'static str,
    name: &'static str,
    state: &'static str,
    /// (name, stars, base nightly price)
    hotels: &'static [(&'static str, u8, f64)],
}

const CITIES: &[CityData] = &[
    CityData {
        code: "new-york",
        name: "New York",
        state: "NY",
        hotels: &[
            ("Grand Central Hotel", 4, 250.0),
            ("Times Square Luxury", 5, 400.0),
            ("Manhattan Business Inn", 3, 180.0),
            ("Brooklyn Bridge Suites", 4, 220.0),
            ("Central Park View", 5, 500.0),
        ],
    },
    CityData {
        code: "los-angeles",
        name: "Los Angeles",
        state: "CA",
        hotels: &[
            ("Hollywood Star Hotel", 4, 200.0),
            ("Beverly Hills Luxury", 5, 600.0),
            ("Santa Monica Beach Resort", 4, 280.0),
            ("Downtown LA Business", 3, 150.0),
            ("Sunset Strip Boutique", 4, 320.0),
        ],
    },
    CityData {
        code: "miami",
        name: "Miami",
        state: "FL",
        hotels: &[
            ("South Beach Resort", 5, 350.0),
            ("Miami Beach Hotel", 4, 200.0),
            ("Downtown Miami Suites", 3, 120.0),
            ("Ocean Drive Luxury", 5, 450.0),
            ("Coral Gables Inn", 3, 140.0),
        ],
    },
    CityData {
        code: "chicago",
        name: "Chicago",
        state: "IL",
        hotels: &[
            ("Magnificent Mile Hotel", 4, 180.0),
            ("River North Luxury", 5, 380.0),
            ("Loop Business Center", 3, 130.0),
            ("Navy Pier Suites", 4, 210.0),
            ("Millennium Park View", 4, 250.0),
        ],
    },
];

struct RoomType {
    kind: &'static str,
    name: &'static str,
    multiplier: f64,
    occupancy: u32,
}

const ROOM_TYPES: &[RoomType] = &[
    RoomType { kind: "standard", name: "Standard Room", multiplier: 1.0, occupancy: 2 },
    RoomType { kind: "deluxe", name: "Deluxe Room", multiplier: 1.3, occupancy: 2 },
    RoomType { kind: "suite", name: "Suite", multiplier: 1.8, occupancy: 4 },
    RoomType { kind: "executive", name: "Executive Room", multiplier: 1.5, occupancy: 2 },
    RoomType { kind: "family", name: "Family Room", multiplier: 1.6, occupancy: 4 },
];

const AMENITIES: &[&str] = &[
    "Free WiFi",
    "Pool",
    "Gym",
    "Spa",
    "Restaurant",
    "Room Service",
    "Business Center",
    "Concierge",
    "Valet Parking",
    "Pet Friendly",
    "Airport Shuttle",
    "Breakfast Included",
];

const STREETS: &[&str] = &["Main St", "Park Ave", "Broadway", "Ocean Dr", "Sunset Blvd"];

pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cities", get(cities))
        .route("/search/hotels", get(search_hotels))
        .route("/book/hotel", post(book_hotel))
        .route("/booking/{reference}", get(booking))
        .route("/cancel/{booking_id}", post(cancel_booking))
}

fn city_data(code: &str) -> Option<&'static CityData> {
    CITIES.iter().find(|c| c.code == code)
}

#[derive(Debug, Default, Deserialize)]
pub struct HotelSearchArgs {
    pub city: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub guests: Option<String>,
    pub rooms: Option<String>,
}

async fn health() -> Json<HealthReport> {
    health_report(ServiceKind::Hotel)
}

async fn cities() -> Json<CitiesResponse> {
    Json(CitiesResponse {
        cities: CITIES
            .iter()
            .map(|c| City {
                city_code: c.code.to_string(),
                name: c.name.to_string(),
                state: c.state.to_string(),
                country: "USA".to_string(),
            })
            .collect(),
    })
}

async fn search_hotels(Query(args): Query<HotelSearchArgs>) -> Result<Json<HotelSearchResponse>, SimError> {
    let criteria = search_criteria(&args)?;
    let today = Utc::now().date_naive();
    let hotels = generate_hotels(&mut rand::thread_rng(), &criteria, today)?;
    tracing::debug!("{} hotels in {}", hotels.len(), criteria.city);

    Ok(Json(HotelSearchResponse {
        count: hotels.len(),
        search_criteria: criteria,
        hotels,
    }))
}

fn search_criteria(args: &HotelSearchArgs) -> Result<HotelSearchCriteria, SimError> {
    let city = args.city.as_deref().unwrap_or("").trim().to_ascii_lowercase().replace(' ', "-");
    let check_in = args.check_in.as_deref().unwrap_or("").trim();
    let check_out = args.check_out.as_deref().unwrap_or("").trim();
    if city.is_empty() || check_in.is_empty() || check_out.is_empty() {
        return Err(SimError::bad_request("City, check_in, and check_out dates are required"));
    }
    if city_data(&city).is_none() {
        return Err(SimError::bad_request("City not available"));
    }

    let check_in = parse_date(check_in)?;
    let check_out = parse_date(check_out)?;
    if check_in >= check_out {
        return Err(SimError::bad_request("Check-out date must be after check-in date"));
    }

    Ok(HotelSearchCriteria {
        city,
        check_in,
        check_out,
        guests: parse_count("guests", args.guests.as_deref(), 2)?,
        rooms: parse_count("rooms", args.rooms.as_deref(), 1)?,
        nights: (check_out - check_in).num_days(),
    })
}

/// Hotels of the city that have a room type for the party, cheapest stay first.
pub fn generate_hotels<R: Rng + ?Sized>(
    rng: &mut R,
    criteria: &HotelSearchCriteria,
    today: NaiveDate,
) -> Result<Vec<Hotel>, SimError> {
    let city = city_data(&criteria.city).ok_or_else(|| SimError::bad_request("City not available"))?;

    let mut hotels = Vec::new();
    for &(name, stars, base_price) in city.hotels {
        let offered = rng.gen_range(2..=4);
        let available_rooms: Vec<Room> = ROOM_TYPES
            .choose_multiple(rng, offered)
            .collect::<Vec<_>>()
            .into_iter()
            .filter(|room_type| room_type.occupancy >= criteria.guests)
            .map(|room_type| {
                let rate = stay_rate(
                    base_price,
                    room_type.multiplier,
                    criteria.check_in,
                    criteria.nights,
                    criteria.rooms,
                    today,
                );
                Room {
                    room_id: uuid::Uuid::new_v4().to_string(),
                    room_type: room_type.kind.to_string(),
                    room_name: room_type.name.to_string(),
                    occupancy: room_type.occupancy,
                    nightly_rate: rate.nightly_rate,
                    total_price: rate.total_price,
                    rooms_available: rng.gen_range(1..=10),
                    bed_type: ["King", "Queen", "Twin", "Double"].choose(rng).unwrap_or(&"King").to_string(),
                    size_sqft: rng.gen_range(200..=800),
                }
            })
            .collect();

        let Some(min_price) = available_rooms.iter().map(|r| r.total_price).min_by(f64::total_cmp) else {
            continue;
        };

        let (chain_id, chain_name) = *CHAINS.choose(rng).unwrap_or(&CHAINS[0]);
        let amenity_count = rng.gen_range(4..=8);
        hotels.push(Hotel {
            hotel_id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            chain: HotelChain {
                id: chain_id.to_string(),
                name: chain_name.to_string(),
            },
            star_rating: stars,
            location: HotelLocation {
                city: city.name.to_string(),
                state: city.state.to_string(),
                country: "USA".to_string(),
                address: format!(
                    "{} {}",
                    rng.gen_range(100..=9999),
                    STREETS.choose(rng).unwrap_or(&STREETS[0])
                ),
            },
            amenities: AMENITIES.choose_multiple(rng, amenity_count).map(|a| a.to_string()).collect(),
            rating: (rng.gen_range(3.5..=4.8_f64) * 10.0).round() / 10.0,
            review_count: rng.gen_range(50..=2000),
            available_rooms,
            distance_to_center: (rng.gen_range(0.5..=15.0_f64) * 10.0).round() / 10.0,
            check_in_time: "3:00 PM".to_string(),
            check_out_time: "11:00 AM".to_string(),
            min_price,
        });
    }

    hotels.sort_by(|a, b| a.min_price.total_cmp(&b.min_price));
    Ok(hotels)
}

async fn book_hotel(
    payload: Result<Json<HotelBookingRequest>, JsonRejection>,
) -> Result<Json<HotelBookingConfirmation>, SimError> {
    let Json(request) = payload?;
    if request.hotel_id.trim().is_empty() || request.room_id.trim().is_empty() {
        return Err(SimError::bad_request("Missing required fields: hotel_id, room_id"));
    }
    if let (Some(check_in), Some(check_out)) = (request.check_in, request.check_out) {
        if check_out <= check_in {
            return Err(SimError::bad_request("Check-out date must be after check-in date"));
        }
    }
    let booking_reference = format!("HB{}", rand::thread_rng().gen_range(100000..=999999));
    tracing::info!("Hotel {} room {} booked as {}", request.hotel_id, request.room_id, booking_reference);

    Ok(Json(HotelBookingConfirmation {
        booking_reference,
        status: "confirmed".to_string(),
        hotel_booking: HotelBookingDetail {
            hotel_id: request.hotel_id,
            room_id: request.room_id,
            booking_time: Utc::now(),
            guest_details: request.guest_details,
            check_in: request.check_in,
            check_out: request.check_out,
        },
        total_amount: request.total_price.unwrap_or(0.0).max(0.0),
        payment_status: "processed".to_string(),
        confirmation_email_sent: true,
        cancellation_policy: "Free cancellation until 24 hours before check-in".to_string(),
    }))
}

async fn booking(Path(reference): Path<String>) -> Json<HotelBookingRecord> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let check_in = now.date_naive() + Duration::days(rng.gen_range(1..=90));
    let nights: u32 = rng.gen_range(1..=7);
    Json(HotelBookingRecord {
        booking_reference: reference,
        status: "confirmed".to_string(),
        guest_count: rng.gen_range(1..=4),
        total_amount: rng.gen_range(150..=1500) as f64,
        booking_date: now - Duration::days(rng.gen_range(1..=30)),
        check_in,
        check_out: check_in + Duration::days(nights as i64),
        nights,
    })
}

async fn cancel_booking(Path(booking_id): Path<String>) -> (StatusCode, Json<CancellationOutcome>) {
    cancellation_response(cancellation(&mut rand::thread_rng(), booking_id))
}

/// Free a week or more before check-in, a moderate fee from two days, a high one after that.
pub fn cancellation_fee<R: Rng + ?Sized>(rng: &mut R, days_until_check_in: i64) -> f64 {
    if days_until_check_in >= 7 {
        0.0
    } else if days_until_check_in >= 2 {
        rng.gen_range(25..=75) as f64
    } else {
        rng.gen_range(100..=200) as f64
    }
}

pub fn cancellation<R: Rng + ?Sized>(rng: &mut R, booking_id: String) -> CancellationOutcome {
    if !rng.gen_bool(0.85) {
        return CancellationOutcome {
            success: false,
            reference: booking_id,
            status: None,
            original_status: None,
            original_amount: None,
            cancellation_fee: None,
            refund_amount: None,
            processing_time: None,
            message: "No-show fee will apply. Please contact hotel directly.".to_string(),
            error: Some("Cancellation not allowed - within 24-hour window".to_string()),
        };
    }

    let days_until_check_in = rng.gen_range(1..=30);
    let fee = cancellation_fee(rng, days_until_check_in);
    let original_amount = rng.gen_range(150..=1200) as f64;
    CancellationOutcome {
        success: true,
        reference: booking_id,
        status: Some("cancelled".to_string()),
        original_status: None,
        original_amount: Some(original_amount),
        cancellation_fee: Some(fee),
        refund_amount: Some((original_amount - fee).max(0.0)),
        processing_time: Some("2-4 business days".to_string()),
        message: "Hotel booking cancelled successfully".to_string(),
        error: None,
    }
}
