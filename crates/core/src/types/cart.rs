//! The cart aggregate and its pure item-list transitions.
//!
//! # Merge policy
//!
//! A cart holds at most one line per `(product, color, size)` key. When a
//! mutation targets a key that is already present, the *stored* line is
//! authoritative for every field except `quantity`: name, price, image,
//! stock bound and client ID of the incoming item are never copied into the
//! cart (the incoming stock bound may only tighten an add's stock check).
//! Lines keep their insertion order across updates.
//!
//! The transitions here only produce candidate item lists. Derived fields
//! (prices, delivery estimate) are never computed locally; they come from a
//! pricing resolver and are applied with [`Cart::commit`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{ClientId, ProductId};
use super::line_item::LineItem;
use super::pricing::{PricingRequest, PricingSummary};

/// Rejection of a candidate item list before any pricing happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartChangeError {
    /// Quantities must be at least one.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Requested quantity exceeds the stock bound of the line.
    #[error("not enough items in stock for {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
}

/// Cart contents plus the derived fields last returned by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<LineItem>,
    pub items_price: Decimal,
    #[serde(default)]
    pub tax_price: Option<Decimal>,
    #[serde(default)]
    pub shipping_price: Option<Decimal>,
    pub total_price: Decimal,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub delivery_date_index: Option<usize>,
    #[serde(default)]
    pub expected_delivery_date: Option<DateTime<Utc>>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty()
    }
}

impl Cart {
    /// An empty cart with baseline derived fields.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            items_price: Decimal::ZERO,
            tax_price: None,
            shipping_price: None,
            total_price: Decimal::ZERO,
            payment_method: None,
            delivery_date_index: None,
            expected_delivery_date: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// The stored line sharing `item`'s composite key.
    #[must_use]
    pub fn find(&self, item: &LineItem) -> Option<&LineItem> {
        self.items.iter().find(|line| line.same_key(item))
    }

    /// Client ID of the stored line sharing `item`'s composite key.
    #[must_use]
    pub fn client_id_of(&self, item: &LineItem) -> Option<&ClientId> {
        self.find(item).map(|line| &line.client_id)
    }

    /// Candidate items after adding `quantity` units of `item`.
    ///
    /// An existing line has its quantity increased; otherwise `item` is
    /// appended with its quantity replaced by `quantity`. Both paths check
    /// the resulting quantity against the stock bound. For an existing line
    /// the tighter of the stored and incoming bounds applies.
    ///
    /// # Errors
    ///
    /// Returns `CartChangeError::InvalidQuantity` for a zero quantity and
    /// `CartChangeError::OutOfStock` if the stock bound would be exceeded.
    pub fn with_added(
        &self,
        item: &LineItem,
        quantity: u32,
    ) -> Result<Vec<LineItem>, CartChangeError> {
        if quantity == 0 {
            return Err(CartChangeError::InvalidQuantity(quantity));
        }

        match self.find(item) {
            Some(existing) => {
                let available = existing.count_in_stock.min(item.count_in_stock);
                let requested = existing.quantity.checked_add(quantity);
                let total = requested
                    .filter(|total| *total <= available)
                    .ok_or_else(|| CartChangeError::OutOfStock {
                        product_id: existing.product_id.clone(),
                        requested: requested.unwrap_or(u32::MAX),
                        available,
                    })?;
                Ok(self.replace_quantity(item, total))
            }
            None => {
                if item.count_in_stock < quantity {
                    return Err(CartChangeError::OutOfStock {
                        product_id: item.product_id.clone(),
                        requested: quantity,
                        available: item.count_in_stock,
                    });
                }
                let mut items = self.items.clone();
                items.push(LineItem {
                    quantity,
                    ..item.clone()
                });
                Ok(items)
            }
        }
    }

    /// Candidate items after setting the quantity of `item`'s line.
    ///
    /// Returns `Ok(None)` if no line matches. No stock check is made; callers
    /// bound `quantity` against the stock they display.
    ///
    /// # Errors
    ///
    /// Returns `CartChangeError::InvalidQuantity` for a zero quantity.
    pub fn with_quantity(
        &self,
        item: &LineItem,
        quantity: u32,
    ) -> Result<Option<Vec<LineItem>>, CartChangeError> {
        if quantity == 0 {
            return Err(CartChangeError::InvalidQuantity(quantity));
        }
        if self.find(item).is_none() {
            return Ok(None);
        }
        Ok(Some(self.replace_quantity(item, quantity)))
    }

    /// Candidate items with every line matching `item`'s key removed.
    #[must_use]
    pub fn without(&self, item: &LineItem) -> Vec<LineItem> {
        self.items
            .iter()
            .filter(|line| !line.same_key(item))
            .cloned()
            .collect()
    }

    /// Pricing request for a candidate list, carrying the current delivery selection.
    #[must_use]
    pub const fn pricing_request(&self, items: Vec<LineItem>) -> PricingRequest {
        PricingRequest::new(items, self.delivery_date_index)
    }

    /// The derived fields currently held by this cart.
    #[must_use]
    pub const fn summary(&self) -> PricingSummary {
        PricingSummary {
            items_price: self.items_price,
            tax_price: self.tax_price,
            shipping_price: self.shipping_price,
            total_price: self.total_price,
            delivery_date_index: self.delivery_date_index,
            expected_delivery_date: self.expected_delivery_date,
        }
    }

    /// The next cart state: `items` together with the resolver's `summary`.
    ///
    /// Every derived field is replaced by the resolver output; only the
    /// payment method carries over.
    #[must_use]
    pub fn commit(&self, items: Vec<LineItem>, summary: PricingSummary) -> Self {
        Self {
            items,
            items_price: summary.items_price,
            tax_price: summary.tax_price,
            shipping_price: summary.shipping_price,
            total_price: summary.total_price,
            payment_method: self.payment_method.clone(),
            delivery_date_index: summary.delivery_date_index,
            expected_delivery_date: summary.expected_delivery_date,
        }
    }

    fn replace_quantity(&self, item: &LineItem, quantity: u32) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|line| {
                if line.same_key(item) {
                    LineItem {
                        quantity,
                        ..line.clone()
                    }
                } else {
                    line.clone()
                }
            })
            .collect()
    }
}
