//! Flight booking partner.

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use perks_shared::models::status::HealthReport;
use perks_shared::models::travel::{
    Airline, Airport, AirportsResponse, Departure, Flight, FlightBookingConfirmation, FlightBookingDetail,
    FlightBookingRecord, FlightBookingRequest, FlightSearchCriteria, FlightSearchResponse,
};
use perks_shared::models::CancellationOutcome;
use perks_shared::ServiceKind;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::error::SimError;
use crate::pricing::flight_fare;
use crate::{cancellation_response, health_report, parse_count, parse_date};

const AIRLINES: &[(&str, &str)] = &[
    ("AA", "American Airlines"),
    ("UA", "United Airlines"),
    ("DL", "Delta Airlines"),
    ("SW", "Southwest Airlines"),
    ("JB", "JetBlue Airways"),
];

const AIRPORTS: &[(&str, &str, &str)] = &[
    ("NYC", "New York", "John F. Kennedy International"),
    ("LAX", "Los Angeles", "Los Angeles International"),
    ("CHI", "Chicago", "O'Hare International"),
    ("MIA", "Miami", "Miami International"),
    ("SFO", "San Francisco", "San Francisco International"),
    ("LAS", "Las Vegas", "McCarran International"),
    ("SEA", "Seattle", "Seattle-Tacoma International"),
    ("DEN", "Denver", "Denver International"),
    ("ATL", "Atlanta", "Hartsfield-Jackson Atlanta International"),
    ("BOS", "Boston", "Logan International"),
];

pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/airports", get(airports))
        .route("/search/flights", get(search_flights))
        .route("/book/flight", post(book_flight))
        .route("/booking/{reference}", get(booking))
        .route("/cancel/{booking_id}", post(cancel_booking))
}

pub fn airport(code: &str) -> Option<Airport> {
    AIRPORTS.iter().find(|(c, _, _)| *c == code).map(|(code, city, name)| Airport {
        code: code.to_string(),
        city: city.to_string(),
        name: name.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct FlightSearchArgs {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub passengers: Option<String>,
}

async fn health() -> Json<HealthReport> {
    health_report(ServiceKind::Travel)
}

async fn airports() -> Json<AirportsResponse> {
    Json(AirportsResponse {
        airports: AIRPORTS.iter().filter_map(|(code, _, _)| airport(code)).collect(),
    })
}

async fn search_flights(Query(args): Query<FlightSearchArgs>) -> Result<Json<FlightSearchResponse>, SimError> {
    let criteria = search_criteria(&args)?;
    let today = Utc::now().date_naive();
    let flights = generate_flights(&mut rand::thread_rng(), &criteria, today)?;
    tracing::debug!("{} flights {} -> {}", flights.len(), criteria.origin, criteria.destination);

    Ok(Json(FlightSearchResponse {
        count: flights.len(),
        search_criteria: criteria,
        flights,
    }))
}

fn search_criteria(args: &FlightSearchArgs) -> Result<FlightSearchCriteria, SimError> {
    let origin = args.origin.as_deref().unwrap_or("").trim().to_ascii_uppercase();
    let destination = args.destination.as_deref().unwrap_or("").trim().to_ascii_uppercase();
    if origin.is_empty() || destination.is_empty() {
        return Err(SimError::bad_request("Origin and destination are required"));
    }
    if airport(&origin).is_none() || airport(&destination).is_none() {
        return Err(SimError::bad_request("Invalid airport code"));
    }

    let departure_date = parse_date(args.departure_date.as_deref().unwrap_or(""))?;
    let return_date = match args.return_date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    if return_date.is_some_and(|ret| ret < departure_date) {
        return Err(SimError::bad_request("Return date must not be before departure date"));
    }
    let passengers = parse_count("passengers", args.passengers.as_deref(), 1)?;

    Ok(FlightSearchCriteria {
        origin,
        destination,
        departure_date,
        return_date,
        passengers,
    })
}

/// Between 3 and 8 flights for the route, cheapest first.
pub fn generate_flights<R: Rng + ?Sized>(
    rng: &mut R,
    criteria: &FlightSearchCriteria,
    today: NaiveDate,
) -> Result<Vec<Flight>, SimError> {
    let origin = airport(&criteria.origin).ok_or_else(|| SimError::bad_request("Invalid airport code"))?;
    let destination =
        airport(&criteria.destination).ok_or_else(|| SimError::bad_request("Invalid airport code"))?;
    let days_ahead = (criteria.departure_date - today).num_days();

    let mut flights: Vec<Flight> = (0..rng.gen_range(3..=8))
        .map(|_| {
            let (code, name) = *AIRLINES.choose(rng).unwrap_or(&AIRLINES[0]);
            let price_per_person = flight_fare(rng, days_ahead, criteria.return_date.is_some());
            Flight {
                flight_id: uuid::Uuid::new_v4().to_string(),
                airline: Airline {
                    code: code.to_string(),
                    name: name.to_string(),
                },
                flight_number: format!("{}{}", code, rng.gen_range(100..=9999)),
                origin: origin.clone(),
                destination: destination.clone(),
                departure: Departure {
                    date: criteria.departure_date,
                    time: format!(
                        "{:02}:{}",
                        rng.gen_range(6..=23),
                        ["00", "15", "30", "45"].choose(rng).unwrap_or(&"00")
                    ),
                },
                duration: format!(
                    "{}h {}m",
                    rng.gen_range(1..=8),
                    [0, 15, 30, 45].choose(rng).unwrap_or(&0)
                ),
                price_per_person,
                total_price: perks_shared::money::round_cents(price_per_person * criteria.passengers as f64),
                seats_available: rng.gen_range(5..=150),
                cabin_class: "Economy".to_string(),
            }
        })
        .collect();

    flights.sort_by(|a, b| a.price_per_person.total_cmp(&b.price_per_person));
    Ok(flights)
}

async fn book_flight(
    payload: Result<Json<FlightBookingRequest>, JsonRejection>,
) -> Result<Json<FlightBookingConfirmation>, SimError> {
    let Json(request) = payload?;
    if request.flight_id.trim().is_empty() {
        return Err(SimError::bad_request("Missing required fields: flight_id"));
    }
    let booking_reference = format!("TB{}", rand::thread_rng().gen_range(100000..=999999));
    tracing::info!("Flight {} booked as {}", request.flight_id, booking_reference);

    Ok(Json(FlightBookingConfirmation {
        booking_reference,
        status: "confirmed".to_string(),
        flight_details: FlightBookingDetail {
            flight_id: request.flight_id,
            booking_time: Utc::now(),
            passengers: request.passenger_details,
        },
        total_amount: request.total_price.unwrap_or(0.0).max(0.0),
        payment_status: "processed".to_string(),
        confirmation_email_sent: true,
    }))
}

async fn booking(Path(reference): Path<String>) -> Json<FlightBookingRecord> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    Json(FlightBookingRecord {
        booking_reference: reference,
        status: "confirmed".to_string(),
        passenger_count: rng.gen_range(1..=4),
        total_amount: rng.gen_range(300..=2000) as f64,
        booking_date: now - Duration::days(rng.gen_range(1..=30)),
        travel_date: now.date_naive() + Duration::days(rng.gen_range(1..=90)),
    })
}

async fn cancel_booking(Path(booking_id): Path<String>) -> (StatusCode, Json<CancellationOutcome>) {
    cancellation_response(cancellation(&mut rand::thread_rng(), booking_id))
}

/// Nine in ten cancellations go through.
pub fn cancellation<R: Rng + ?Sized>(rng: &mut R, booking_id: String) -> CancellationOutcome {
    if rng.gen_bool(0.9) {
        let cancellation_fee = rng.gen_range(50..=200) as f64;
        let original_amount = rng.gen_range(300..=1700) as f64;
        CancellationOutcome {
            success: true,
            reference: booking_id,
            status: Some("cancelled".to_string()),
            original_status: None,
            original_amount: Some(original_amount),
            cancellation_fee: Some(cancellation_fee),
            refund_amount: Some(original_amount - cancellation_fee),
            processing_time: Some("3-5 business days".to_string()),
            message: "Booking cancelled successfully".to_string(),
            error: None,
        }
    } else {
        CancellationOutcome {
            success: false,
            reference: booking_id,
            status: None,
            original_status: None,
            original_amount: None,
            cancellation_fee: None,
            refund_amount: None,
            processing_time: None,
            message: "Please contact customer service".to_string(),
            error: Some("Cancellation not allowed - flight departure within 2 hours".to_string()),
        }
    }
}
