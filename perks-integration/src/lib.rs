//! Card-perks integration layer: simulator clients, the aggregator that
//! prices partner results with customer offers, and the status monitor.

pub mod aggregator;
pub mod client;
pub mod error;
pub mod monitor;
pub mod package;
pub mod response;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::Aggregator;
pub use client::{http_client, HotelClient, ShoppingClient, SimulatorClients, TravelClient};
pub use error::{AggResult, AggregateError, Leg, LegFailure};
pub use monitor::StatusMonitor;
pub use package::{PackageHotel, TravelPackage};
pub use response::{BookingReceipt, OfferBooking, Priced, ServiceResponse};

use perks_offer::OfferBook;
use std::sync::Arc;

impl SimulatorClients {
    /// Aggregator over these clients.
    pub fn aggregator(&self, offers: OfferBook) -> Aggregator {
        Aggregator::new(
            Arc::new(self.travel.clone()),
            Arc::new(self.hotel.clone()),
            Arc::new(self.shopping.clone()),
            offers,
        )
    }

    pub fn monitor(&self) -> StatusMonitor {
        StatusMonitor::new(vec![
            Arc::new(self.travel.clone()),
            Arc::new(self.hotel.clone()),
            Arc::new(self.shopping.clone()),
        ])
    }
}
