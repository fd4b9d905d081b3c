use perks_integration::{Aggregator, SimulatorClients, StatusMonitor};
use perks_offer::OfferBook;
use perks_store::app_config::SimulatorEndpoints;
use perks_store::InMemoryOfferRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    pub monitor: StatusMonitor,
    pub offers: OfferBook,
}

impl AppState {
    pub fn new(aggregator: Aggregator, monitor: StatusMonitor) -> Self {
        let offers = aggregator.offers().clone();
        Self {
            aggregator,
            monitor,
            offers,
        }
    }

    /// Live simulator clients with an in-memory offer book.
    pub fn from_endpoints(endpoints: &SimulatorEndpoints) -> anyhow::Result<Self> {
        let clients = SimulatorClients::from_config(endpoints)?;
        let offers = OfferBook::new(Arc::new(InMemoryOfferRepository::new()));
        Ok(Self::new(clients.aggregator(offers), clients.monitor()))
    }
}
