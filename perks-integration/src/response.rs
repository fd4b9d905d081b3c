//! Shapes returned by the aggregator.

use perks_core::search::PackageSearchQuery;
use perks_core::simulator::SimulatorError;
use perks_offer::{CustomerOffer, Pricing};
use perks_shared::models::hotel::{Hotel, HotelSearchCriteria};
use perks_shared::models::shopping::{Product, ProductSearchCriteria};
use perks_shared::models::travel::{Flight, FlightSearchCriteria};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::package::TravelPackage;

/// A single-service answer. When the simulator is unavailable the body is
/// empty and `warning` says which partner could not be reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub body: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(body: T) -> Self {
        Self { body, warning: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

impl<T: Default> ServiceResponse<T> {
    pub fn degraded(err: &SimulatorError) -> Self {
        Self {
            body: T::default(),
            warning: Some(format!(
                "{} service is currently unavailable, showing no results",
                err.service()
            )),
        }
    }
}

/// A partner item next to its price after the customer's best offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priced<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(flatten)]
    pub pricing: Pricing,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightResults {
    pub search_criteria: Option<FlightSearchCriteria>,
    pub flights: Vec<Priced<Flight>>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotelResults {
    pub search_criteria: Option<HotelSearchCriteria>,
    pub hotels: Vec<Priced<Hotel>>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductResults {
    pub search_criteria: Option<ProductSearchCriteria>,
    pub products: Vec<Priced<Product>>,
    pub total_count: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageResults {
    pub search_criteria: PackageSearchQuery,
    pub travel_packages: Vec<TravelPackage>,
    pub count: usize,
    pub flights_considered: usize,
    pub hotels_considered: usize,
}

/// A booking body plus the offer the customer booked through, if any.
///
/// The extra fields are stripped before the request reaches the partner.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferBooking<T> {
    #[serde(flatten)]
    pub request: T,
    pub customer_id: Option<String>,
    pub offer_id: Option<Uuid>,
    /// Discount the customer was quoted for this booking.
    #[serde(default)]
    pub discount_applied: f64,
}

impl<T> OfferBooking<T> {
    pub fn plain(request: T) -> Self {
        Self {
            request,
            customer_id: None,
            offer_id: None,
            discount_applied: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingReceipt<T> {
    #[serde(flatten)]
    pub confirmation: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_usage: Option<CustomerOffer>,
}
