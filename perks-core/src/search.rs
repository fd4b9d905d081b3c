use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::iata::{hotel_city_for, parse_airport_code, parse_hotel_city};
use crate::{CoreError, CoreResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_PASSENGERS: u32 = 9;
const MAX_GUESTS: u32 = 8;
const MAX_ROOMS: u32 = 5;
const MAX_PRODUCT_LIMIT: u32 = 100;

// ============================================================================
// Raw query-string parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSearchParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub passengers: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelSearchParams {
    pub city: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub guests: Option<String>,
    pub rooms: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSearchParams {
    pub category: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub brand: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageSearchParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub passengers: Option<String>,
    pub customer_id: Option<String>,
}

// ============================================================================
// Validated queries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSearchQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub passengers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelSearchQuery {
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Rating,
}

impl ProductSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSort::Relevance => "relevance",
            ProductSort::PriceLow => "price_low",
            ProductSort::PriceHigh => "price_high",
            ProductSort::Rating => "rating",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "relevance" => Some(ProductSort::Relevance),
            "price_low" => Some(ProductSort::PriceLow),
            "price_high" => Some(ProductSort::PriceHigh),
            "rating" => Some(ProductSort::Rating),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSearchQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub brand: Option<String>,
    pub sort: ProductSort,
    pub limit: u32,
}

/// A flight + hotel search for one trip. Hotel dates default to the flight dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSearchQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub passengers: u32,
    /// Hotel partner city for `destination`.
    pub hotel_city: String,
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(field: &str, value: &'a Option<String>) -> CoreResult<&'a str> {
    non_empty(value).ok_or_else(|| CoreError::validation(field, "is required"))
}

pub fn parse_date(field: &str, raw: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CoreError::validation(field, format!("`{}` is not a valid date, use YYYY-MM-DD", raw.trim())))
}

fn optional_date(field: &str, value: &Option<String>) -> CoreResult<Option<NaiveDate>> {
    non_empty(value).map(|raw| parse_date(field, raw)).transpose()
}

fn bounded_count(field: &str, value: &Option<String>, default: u32, max: u32) -> CoreResult<u32> {
    let Some(raw) = non_empty(value) else {
        return Ok(default);
    };
    let count: u32 = raw
        .parse()
        .map_err(|_| CoreError::validation(field, format!("`{}` is not a whole number", raw)))?;
    if count == 0 || count > max {
        return Err(CoreError::validation(field, format!("must be between 1 and {}", max)));
    }
    Ok(count)
}

fn optional_amount(field: &str, value: &Option<String>) -> CoreResult<Option<f64>> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    let amount: f64 = raw
        .parse()
        .map_err(|_| CoreError::validation(field, format!("`{}` is not a number", raw)))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::validation(field, "must be a non-negative amount"));
    }
    Ok(Some(amount))
}

// ============================================================================
// Validation
// ============================================================================

impl FlightSearchQuery {
    pub fn from_params(params: &FlightSearchParams) -> CoreResult<Self> {
        let origin = parse_airport_code("origin", required("origin", &params.origin)?)?;
        let destination = parse_airport_code("destination", required("destination", &params.destination)?)?;
        if origin == destination {
            return Err(CoreError::validation("destination", "must differ from origin"));
        }
        let departure_date = parse_date("departure_date", required("departure_date", &params.departure_date)?)?;
        let return_date = optional_date("return_date", &params.return_date)?;
        if let Some(ret) = return_date {
            if ret < departure_date {
                return Err(CoreError::validation("return_date", "must not be before departure_date"));
            }
        }
        let passengers = bounded_count("passengers", &params.passengers, 1, MAX_PASSENGERS)?;

        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date,
            passengers,
        })
    }

    /// Query-string pairs understood by the travel simulator.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("origin", self.origin.clone()),
            ("destination", self.destination.clone()),
            ("departure_date", self.departure_date.format(DATE_FORMAT).to_string()),
            ("passengers", self.passengers.to_string()),
        ];
        if let Some(ret) = self.return_date {
            pairs.push(("return_date", ret.format(DATE_FORMAT).to_string()));
        }
        pairs
    }
}

impl HotelSearchQuery {
    pub fn from_params(params: &HotelSearchParams) -> CoreResult<Self> {
        let city = parse_hotel_city("city", required("city", &params.city)?)?;
        let check_in = parse_date("check_in", required("check_in", &params.check_in)?)?;
        let check_out = parse_date("check_out", required("check_out", &params.check_out)?)?;
        if check_out <= check_in {
            return Err(CoreError::validation("check_out", "must be after check_in"));
        }
        let guests = bounded_count("guests", &params.guests, 2, MAX_GUESTS)?;
        let rooms = bounded_count("rooms", &params.rooms, 1, MAX_ROOMS)?;

        Ok(Self {
            city,
            check_in,
            check_out,
            guests,
            rooms,
        })
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("city", self.city.clone()),
            ("check_in", self.check_in.format(DATE_FORMAT).to_string()),
            ("check_out", self.check_out.format(DATE_FORMAT).to_string()),
            ("guests", self.guests.to_string()),
            ("rooms", self.rooms.to_string()),
        ]
    }
}

impl ProductSearchQuery {
    pub fn from_params(params: &ProductSearchParams) -> CoreResult<Self> {
        let min_price = optional_amount("min_price", &params.min_price)?;
        let max_price = optional_amount("max_price", &params.max_price)?;
        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(CoreError::validation("min_price", "must not exceed max_price"));
            }
        }
        let sort = match non_empty(&params.sort) {
            None => ProductSort::default(),
            Some(raw) => ProductSort::parse(raw).ok_or_else(|| {
                CoreError::validation("sort", "must be one of relevance, price_low, price_high, rating")
            })?,
        };
        let limit = bounded_count("limit", &params.limit, 20, MAX_PRODUCT_LIMIT)?;

        Ok(Self {
            category: non_empty(&params.category).map(str::to_ascii_lowercase),
            q: non_empty(&params.q).map(str::to_string),
            min_price,
            max_price,
            brand: non_empty(&params.brand).map(str::to_string),
            sort,
            limit,
        })
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("sort", self.sort.as_str().to_string()), ("limit", self.limit.to_string())];
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if let Some(brand) = &self.brand {
            pairs.push(("brand", brand.clone()));
        }
        pairs
    }
}

impl PackageSearchQuery {
    pub fn from_params(params: &PackageSearchParams) -> CoreResult<Self> {
        let origin = parse_airport_code("origin", required("origin", &params.origin)?)?;
        let destination = parse_airport_code("destination", required("destination", &params.destination)?)?;
        if origin == destination {
            return Err(CoreError::validation("destination", "must differ from origin"));
        }
        let hotel_city = hotel_city_for(&destination)
            .ok_or_else(|| CoreError::validation("destination", format!("no hotels are offered at `{}`", destination)))?;
        let departure_date = parse_date("departure_date", required("departure_date", &params.departure_date)?)?;
        let return_date = parse_date("return_date", required("return_date", &params.return_date)?)?;
        if return_date < departure_date {
            return Err(CoreError::validation("return_date", "must not be before departure_date"));
        }
        let check_in = optional_date("check_in", &params.check_in)?.unwrap_or(departure_date);
        let check_out = optional_date("check_out", &params.check_out)?.unwrap_or(return_date);
        if check_out <= check_in {
            return Err(CoreError::validation("check_out", "must be after check_in"));
        }
        let passengers = bounded_count("passengers", &params.passengers, 1, MAX_PASSENGERS)?;

        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date,
            check_in,
            check_out,
            passengers,
            hotel_city: hotel_city.to_string(),
        })
    }

    pub fn flight_query(&self) -> FlightSearchQuery {
        FlightSearchQuery {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            departure_date: self.departure_date,
            return_date: Some(self.return_date),
            passengers: self.passengers,
        }
    }

    /// One room at the destination for every traveller.
    pub fn hotel_query(&self) -> HotelSearchQuery {
        HotelSearchQuery {
            city: self.hotel_city.clone(),
            check_in: self.check_in,
            check_out: self.check_out,
            guests: self.passengers.min(MAX_GUESTS),
            rooms: 1,
        }
    }
}
