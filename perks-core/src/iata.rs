//! Airport code handling and the airport → hotel city mapping used by package search.

use crate::{CoreError, CoreResult};

/// Airports the travel partner flies between.
pub const SERVED_AIRPORTS: [&str; 10] = ["NYC", "LAX", "CHI", "MIA", "SFO", "LAS", "SEA", "DEN", "ATL", "BOS"];

/// Destination airports with hotel coverage, and the hotel partner's slug for each.
const HOTEL_CITIES: [(&str, &str); 4] = [
    ("NYC", "new-york"),
    ("LAX", "los-angeles"),
    ("MIA", "miami"),
    ("CHI", "chicago"),
];

/// Normalizes a three-letter airport code and checks the partner serves it.
pub fn parse_airport_code(field: &str, raw: &str) -> CoreResult<String> {
    let code = raw.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::validation(field, format!("`{}` is not a three-letter airport code", raw.trim())));
    }
    if !SERVED_AIRPORTS.contains(&code.as_str()) {
        return Err(CoreError::validation(field, format!("no flights serve airport `{}`", code)));
    }
    Ok(code)
}

/// Hotel partner city slug for a destination airport, if hotels are offered there.
pub fn hotel_city_for(airport_code: &str) -> Option<&'static str> {
    HOTEL_CITIES
        .iter()
        .find(|(code, _)| *code == airport_code)
        .map(|(_, city)| *city)
}

/// City slug normalization shared with the hotel simulator (`"New York"` → `"new-york"`).
pub fn city_slug(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(' ', "-")
}

/// Normalizes a city name and checks the hotel partner lists it.
pub fn parse_hotel_city(field: &str, raw: &str) -> CoreResult<String> {
    let slug = city_slug(raw);
    if slug.is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    if !HOTEL_CITIES.iter().any(|(_, city)| *city == slug) {
        return Err(CoreError::validation(field, format!("no hotels are listed in `{}`", raw.trim())));
    }
    Ok(slug)
}
