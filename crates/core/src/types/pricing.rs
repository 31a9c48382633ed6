//! Pricing resolver request and response records.
//!
//! These are the wire types of the trusted pricing call: the cart sends its
//! candidate item list, the resolver answers with every derived field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::LineItem;

/// Candidate item list submitted for pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub items: Vec<LineItem>,
    /// Delivery option currently selected by the shopper, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date_index: Option<usize>,
}

impl PricingRequest {
    /// Build a request for `items` with an optional delivery selection.
    #[must_use]
    pub const fn new(items: Vec<LineItem>, delivery_date_index: Option<usize>) -> Self {
        Self {
            items,
            delivery_date_index,
        }
    }
}

/// Authoritative derived fields for an item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    pub items_price: Decimal,
    #[serde(default)]
    pub tax_price: Option<Decimal>,
    #[serde(default)]
    pub shipping_price: Option<Decimal>,
    pub total_price: Decimal,
    #[serde(default)]
    pub delivery_date_index: Option<usize>,
    #[serde(default)]
    pub expected_delivery_date: Option<DateTime<Utc>>,
}

impl PricingSummary {
    /// Derived fields of an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items_price: Decimal::ZERO,
            tax_price: None,
            shipping_price: None,
            total_price: Decimal::ZERO,
            delivery_date_index: None,
            expected_delivery_date: None,
        }
    }
}

impl Default for PricingSummary {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_delivery_index() {
        let json = serde_json::to_value(PricingRequest::new(Vec::new(), None)).unwrap();
        assert_eq!(json, serde_json::json!({ "items": [] }));
    }

    #[test]
    fn test_summary_accepts_sparse_response() {
        let summary: PricingSummary =
            serde_json::from_str(r#"{"itemsPrice":"0","totalPrice":"0"}"#).unwrap();
        assert_eq!(summary, PricingSummary::empty());
    }
}
