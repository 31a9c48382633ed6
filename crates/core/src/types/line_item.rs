//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ClientId, ProductId};

/// One purchasable selection (product + color + size) with a quantity.
///
/// `count_in_stock` is the inventory bound the caller saw when the item was
/// offered; the cart never re-fetches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Locally generated identifier for UI tracking.
    pub client_id: ClientId,
    /// Catalog product this line refers to.
    #[serde(rename = "product")]
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub color: String,
    pub size: String,
    pub quantity: u32,
    pub count_in_stock: u32,
    /// Unit price at the time the item was offered.
    #[serde(rename = "price")]
    pub unit_price: Decimal,
}

impl LineItem {
    /// The composite key identifying this line within a cart.
    #[must_use]
    pub fn key(&self) -> LineKey<'_> {
        LineKey {
            product_id: &self.product_id,
            color: &self.color,
            size: &self.size,
        }
    }

    /// Whether `other` refers to the same `(product, color, size)` selection.
    #[must_use]
    pub fn same_key(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

/// Composite `(product, color, size)` key of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey<'a> {
    pub product_id: &'a ProductId,
    pub color: &'a str,
    pub size: &'a str,
}

impl std::fmt::Display for LineKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.product_id, self.color, self.size)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A line item with sensible defaults for tests.
    pub fn item(product: &str, color: &str, size: &str) -> LineItem {
        LineItem {
            client_id: ClientId::generate(),
            product_id: ProductId::new(product),
            name: format!("Product {product}"),
            slug: format!("product-{product}"),
            category: "Shirts".to_string(),
            image: format!("/images/{product}.jpg"),
            color: color.to_string(),
            size: size.to_string(),
            quantity: 1,
            count_in_stock: 5,
            unit_price: Decimal::new(1_000, 2),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::item;

    #[test]
    fn test_key_ignores_metadata() {
        let a = item("p1", "Red", "M");
        let mut b = item("p1", "Red", "M");
        b.name = "Renamed".to_string();
        b.quantity = 4;
        assert!(a.same_key(&b));
        assert_ne!(a.client_id, b.client_id);
    }

    #[test]
    fn test_key_distinguishes_variants() {
        let a = item("p1", "Red", "M");
        assert!(!a.same_key(&item("p1", "Blue", "M")));
        assert!(!a.same_key(&item("p1", "Red", "L")));
        assert!(!a.same_key(&item("p2", "Red", "M")));
        assert_eq!(a.key().to_string(), "p1/Red/M");
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(item("p1", "Red", "M")).unwrap();
        assert_eq!(json["product"], "p1");
        assert_eq!(json["countInStock"], 5);
        assert_eq!(json["price"], "10.00");
        assert!(json.get("clientId").is_some());
    }
}
