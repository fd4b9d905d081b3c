pub mod app_config;
pub mod offer_repo;

pub use app_config::Config;
pub use offer_repo::InMemoryOfferRepository;
