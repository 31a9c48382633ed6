//! Currency amounts using decimal arithmetic.
//!
//! All cart amounts are `rust_decimal::Decimal` in the store's currency
//! (dollars, not cents). They serialize as strings to avoid float drift in
//! persisted snapshots and on the wire.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to two decimal places, midpoints away from zero.
///
/// ```rust
/// # use amazona_core::round2;
/// # use rust_decimal::Decimal;
/// assert_eq!(round2(Decimal::new(10_005, 3)), Decimal::new(1_001, 2));
/// ```
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display (e.g., "$19.99").
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = round2(amount);
    if rounded.is_sign_negative() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${rounded:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round2_midpoint() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(1.004)), dec!(1.00));
        assert_eq!(round2(dec!(12.9)), dec!(12.9));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(0)), "$0.00");
        assert_eq!(format_price(dec!(19.9)), "$19.90");
        assert_eq!(format_price(dec!(4.999)), "$5.00");
        assert_eq!(format_price(dec!(-3.5)), "-$3.50");
    }
}
