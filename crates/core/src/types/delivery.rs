//! Delivery options offered at checkout.

use rust_decimal::Decimal;

/// A selectable delivery option.
///
/// Carts refer to an option by its position in [`AVAILABLE_DELIVERY_DATES`]
/// (`deliveryDateIndex`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryDate {
    pub name: &'static str,
    pub days_to_deliver: u32,
    pub shipping_price: Decimal,
    /// Items subtotal at which shipping becomes free; zero disables the rule.
    pub free_shipping_min_price: Decimal,
}

impl DeliveryDate {
    /// Whether this option ships for free at the given items subtotal.
    #[must_use]
    pub fn ships_free(&self, items_price: Decimal) -> bool {
        self.free_shipping_min_price > Decimal::ZERO && items_price >= self.free_shipping_min_price
    }
}

/// Delivery options, fastest first. The last entry is the default selection.
pub const AVAILABLE_DELIVERY_DATES: [DeliveryDate; 3] = [
    DeliveryDate {
        name: "Tomorrow",
        days_to_deliver: 1,
        shipping_price: Decimal::from_parts(1290, 0, 0, false, 2),
        free_shipping_min_price: Decimal::ZERO,
    },
    DeliveryDate {
        name: "Next 3 Days",
        days_to_deliver: 3,
        shipping_price: Decimal::from_parts(690, 0, 0, false, 2),
        free_shipping_min_price: Decimal::ZERO,
    },
    DeliveryDate {
        name: "Next 5 Days",
        days_to_deliver: 5,
        shipping_price: Decimal::from_parts(490, 0, 0, false, 2),
        free_shipping_min_price: Decimal::from_parts(35, 0, 0, false, 0),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_table_constants() {
        let [tomorrow, three, five] = AVAILABLE_DELIVERY_DATES;
        assert_eq!(tomorrow.shipping_price, dec!(12.90));
        assert_eq!(three.shipping_price, dec!(6.90));
        assert_eq!(five.shipping_price, dec!(4.90));
        assert_eq!(five.free_shipping_min_price, dec!(35));
    }

    #[test]
    fn test_ships_free_threshold() {
        let [tomorrow, _, five] = AVAILABLE_DELIVERY_DATES;
        assert!(!tomorrow.ships_free(dec!(1000)));
        assert!(!five.ships_free(dec!(34.99)));
        assert!(five.ships_free(dec!(35)));
    }
}
