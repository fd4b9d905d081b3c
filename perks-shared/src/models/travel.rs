use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Validate;
use crate::money::check_amount;
use crate::pii::Masked;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Airline {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Airport {
    pub code: String,
    pub city: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirportsResponse {
    pub airports: Vec<Airport>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Departure {
    pub date: NaiveDate,
    pub time: String,
}

/// A single priced flight option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    pub flight_id: String,
    pub airline: Airline,
    pub flight_number: String,
    pub origin: Airport,
    pub destination: Airport,
    pub departure: Departure,
    pub duration: String,
    pub price_per_person: f64,
    /// price_per_person × passengers
    pub total_price: f64,
    pub seats_available: u32,
    pub cabin_class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightSearchCriteria {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub passengers: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSearchResponse {
    pub search_criteria: FlightSearchCriteria,
    pub flights: Vec<Flight>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightBookingRequest {
    pub flight_id: String,
    pub passenger_details: serde_json::Value,
    pub payment_method: Masked<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightBookingDetail {
    pub flight_id: String,
    pub booking_time: DateTime<Utc>,
    pub passengers: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightBookingConfirmation {
    pub booking_reference: String,
    pub status: String,
    pub flight_details: FlightBookingDetail,
    pub total_amount: f64,
    pub payment_status: String,
    pub confirmation_email_sent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightBookingRecord {
    pub booking_reference: String,
    pub status: String,
    pub passenger_count: u32,
    pub total_amount: f64,
    pub booking_date: DateTime<Utc>,
    pub travel_date: NaiveDate,
}

impl Validate for AirportsResponse {
    fn validate(&self) -> Result<(), String> {
        match self.airports.iter().find(|a| a.code.trim().is_empty()) {
            Some(_) => Err("airport with empty code".to_string()),
            None => Ok(()),
        }
    }
}

impl Validate for Flight {
    fn validate(&self) -> Result<(), String> {
        check_amount("price_per_person", self.price_per_person)?;
        check_amount("total_price", self.total_price)
    }
}

impl Validate for FlightSearchResponse {
    fn validate(&self) -> Result<(), String> {
        self.flights.validate()
    }
}

impl Validate for FlightBookingConfirmation {
    fn validate(&self) -> Result<(), String> {
        check_amount("total_amount", self.total_amount)
    }
}

impl Validate for FlightBookingRecord {
    fn validate(&self) -> Result<(), String> {
        check_amount("total_amount", self.total_amount)
    }
}
