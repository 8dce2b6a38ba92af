//! Amount validation and formatting.
//!
//! Balances are native `f64`. These helpers keep the validation rules and
//! the two textual renderings (history entries and snapshot balances) in
//! one place.

use crate::error::{LedgerError, Result};

/// Check that a mutation amount is finite and strictly positive.
pub fn validate_positive(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}

/// Check that an opening balance is finite and not negative.
pub fn validate_opening(balance: f64) -> Result<f64> {
    if balance.is_finite() && balance >= 0.0 {
        Ok(balance)
    } else {
        Err(LedgerError::InvalidAmount(balance))
    }
}

/// Balance after crediting `amount`, rejecting a sum that overflows to infinity.
pub fn checked_credit(balance: f64, amount: f64) -> Result<f64> {
    let credited = balance + amount;
    if credited.is_finite() {
        Ok(credited)
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}

/// Render a balance with exactly two fractional digits.
pub fn format_balance(balance: f64) -> String {
    format!("{balance:.2}")
}

/// Render an amount in its shortest round-trip form (`50`, `12.5`).
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_credit() {
        assert_eq!(checked_credit(100.0, 50.0), Ok(150.0));
        assert_eq!(
            checked_credit(f64::MAX, f64::MAX),
            Err(LedgerError::InvalidAmount(f64::MAX))
        );
    }

    #[test]
    fn test_validate_positive() {
        assert_eq!(validate_positive(50.0), Ok(50.0));
        assert_eq!(validate_positive(0.01), Ok(0.01));
        assert!(validate_positive(0.0).is_err());
        assert!(validate_positive(-5.0).is_err());
        assert!(validate_positive(f64::NAN).is_err());
        assert!(validate_positive(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_opening() {
        assert_eq!(validate_opening(0.0), Ok(0.0));
        assert_eq!(validate_opening(100.0), Ok(100.0));
        assert_eq!(
            validate_opening(-1.0),
            Err(LedgerError::InvalidAmount(-1.0))
        );
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_balance(150.0), "150.00");
        assert_eq!(format_balance(0.1 + 0.2), "0.30");
        assert_eq!(format_amount(50.0), "50");
        assert_eq!(format_amount(12.5), "12.5");
    }
}
