//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored and serialized as `f64`; every calculation goes
//! through `Decimal` and is rounded back to 2 places (half-up).

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

#[inline]
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Normalize a client-supplied price to 2 decimal places
pub fn normalize_price(price: f64) -> f64 {
    to_f64(to_decimal(price))
}

/// `price * quantity`, rounded
pub fn line_total(price: f64, quantity: i64) -> Decimal {
    round(to_decimal(price) * Decimal::from(quantity))
}

/// Sum of already rounded line totals
pub fn sum_lines<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round(lines.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_avoids_float_drift() {
        // 0.1 + 0.2 != 0.3 in f64
        let total = sum_lines([to_decimal(0.1), to_decimal(0.2)]);
        assert_eq!(to_f64(total), 0.3);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(10.0, 3)), 30.0);
        assert_eq!(to_f64(line_total(19.99, 3)), 59.97);
        assert_eq!(to_f64(line_total(0.0, 5)), 0.0);
    }

    #[test]
    fn test_normalize_price_rounds_to_cents() {
        assert_eq!(normalize_price(1.236), 1.24);
        assert_eq!(normalize_price(1.2349), 1.23);
        assert_eq!(normalize_price(12.5), 12.5);
    }

    #[test]
    fn test_sum_lines_empty_is_zero() {
        assert_eq!(to_f64(sum_lines(Vec::new())), 0.0);
    }
}
