use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Validate;
use crate::money::check_amount;
use crate::pii::Masked;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub city_code: String,
    pub name: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitiesResponse {
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelChain {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelLocation {
    pub city: String,
    pub state: String,
    pub country: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub room_id: String,
    pub room_type: String,
    pub room_name: String,
    pub occupancy: u32,
    pub nightly_rate: f64,
    /// nightly_rate × nights × rooms
    pub total_price: f64,
    pub rooms_available: u32,
    pub bed_type: String,
    pub size_sqft: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hotel {
    pub hotel_id: String,
    pub name: String,
    pub chain: HotelChain,
    pub star_rating: u8,
    pub location: HotelLocation,
    pub amenities: Vec<String>,
    pub rating: f64,
    pub review_count: u32,
    pub available_rooms: Vec<Room>,
    pub distance_to_center: f64,
    pub check_in_time: String,
    pub check_out_time: String,
    /// Cheapest room total for the whole stay.
    pub min_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelSearchCriteria {
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
    pub nights: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelSearchResponse {
    pub search_criteria: HotelSearchCriteria,
    pub hotels: Vec<Hotel>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelBookingRequest {
    pub hotel_id: String,
    pub room_id: String,
    pub guest_details: serde_json::Value,
    pub payment_method: Masked<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelBookingDetail {
    pub hotel_id: String,
    pub room_id: String,
    pub booking_time: DateTime<Utc>,
    pub guest_details: serde_json::Value,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelBookingConfirmation {
    pub booking_reference: String,
    pub status: String,
    pub hotel_booking: HotelBookingDetail,
    pub total_amount: f64,
    pub payment_status: String,
    pub confirmation_email_sent: bool,
    pub cancellation_policy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelBookingRecord {
    pub booking_reference: String,
    pub status: String,
    pub guest_count: u32,
    pub total_amount: f64,
    pub booking_date: DateTime<Utc>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
}

impl Validate for CitiesResponse {
    fn validate(&self) -> Result<(), String> {
        match self.cities.iter().find(|c| c.city_code.trim().is_empty()) {
            Some(_) => Err("city with empty city_code".to_string()),
            None => Ok(()),
        }
    }
}

impl Validate for Room {
    fn validate(&self) -> Result<(), String> {
        check_amount("nightly_rate", self.nightly_rate)?;
        check_amount("total_price", self.total_price)
    }
}

impl Validate for Hotel {
    fn validate(&self) -> Result<(), String> {
        check_amount("min_price", self.min_price)?;
        self.available_rooms.validate()
    }
}

impl Validate for HotelSearchResponse {
    fn validate(&self) -> Result<(), String> {
        self.hotels.validate()
    }
}

impl Validate for HotelBookingConfirmation {
    fn validate(&self) -> Result<(), String> {
        check_amount("total_amount", self.total_amount)
    }
}

impl Validate for HotelBookingRecord {
    fn validate(&self) -> Result<(), String> {
        check_amount("total_amount", self.total_amount)
    }
}
