/// Round an amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Fails when `amount` is NaN, infinite or negative.
pub fn check_amount(label: &str, amount: f64) -> Result<(), String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("{} must be a non-negative amount, got {}", label, amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(389.999), 390.0);
        assert_eq!(round_cents(12.344), 12.34);
        assert_eq!(round_cents(0.0), 0.0);
    }

    #[test]
    fn test_check_amount_rejects_negative_and_nan() {
        assert!(check_amount("price", 0.0).is_ok());
        assert!(check_amount("price", 10.5).is_ok());
        assert!(check_amount("price", -0.01).is_err());
        assert!(check_amount("price", f64::NAN).is_err());
        assert!(check_amount("price", f64::INFINITY).is_err());
    }
}
