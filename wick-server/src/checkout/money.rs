//! Money helpers
//!
//! Amounts live as f64 on the documents; every computation goes through
//! Decimal to keep float artifacts out of totals and gateway amounts.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

pub fn to_f64(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or(0.0)
}

/// Convert a major-unit amount to gateway minor units (rupees → paise).
///
/// round(total × 100), midpoint away from zero.
pub fn to_minor_units(amount: f64) -> i64 {
    (to_decimal(amount) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_addition_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(24.99), 2499);
        assert_eq!(to_minor_units(22.50), 2250);
        assert_eq!(to_minor_units(0.0), 0);
        assert_eq!(to_minor_units(100.0), 10000);
    }

    #[test]
    fn test_minor_units_rounding() {
        // Sub-paise artifacts round to the nearest paise, midpoint up
        assert_eq!(to_minor_units(10.005), 1001);
        assert_eq!(to_minor_units(10.004), 1000);
    }
}
