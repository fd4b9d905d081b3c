use serde::{Deserialize, Serialize};
use crate::money::check_amount;
use super::Validate;

/// Result of `POST /cancel/{reference}` on any simulator.
///
/// A refused cancellation comes back with `success: false` and a 400 status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancellationOutcome {
    pub success: bool,
    #[serde(alias = "booking_id", alias = "order_id")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Validate for CancellationOutcome {
    fn validate(&self) -> Result<(), String> {
        for (label, amount) in [
            ("original_amount", self.original_amount),
            ("cancellation_fee", self.cancellation_fee),
            ("refund_amount", self.refund_amount),
        ] {
            if let Some(amount) = amount {
                check_amount(label, amount)?;
            }
        }
        Ok(())
    }
}
