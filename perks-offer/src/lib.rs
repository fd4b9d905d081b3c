pub mod book;
pub mod discount;
pub mod models;
pub mod repository;
pub mod rules;

pub use book::{OfferBook, OfferFilter, UsageClaim};
pub use discount::{apply_discount, DiscountOutcome};
pub use models::{CustomerOffer, NewOffer, Offer, OfferCategory, OfferStatus};
pub use repository::OfferRepository;
pub use rules::{AppliedOffer, DiscountRules, Pricing};
