pub mod cancellation;
pub mod hotel;
pub mod shopping;
pub mod status;
pub mod travel;

pub use cancellation::CancellationOutcome;

/// Sanity checks run on partner payloads at the client boundary.
///
/// Anything that fails here is treated as a malformed response, so the
/// aggregator only ever sees non-negative, finite prices.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter().try_for_each(Validate::validate)
    }
}
