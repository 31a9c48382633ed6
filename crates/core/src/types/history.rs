//! Recently viewed products.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Maximum number of products kept in the browsing history.
pub const HISTORY_CAPACITY: usize = 10;

/// A product the shopper has viewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewedProduct {
    pub id: ProductId,
    pub category: String,
}

impl ViewedProduct {
    #[must_use]
    pub fn new(id: impl Into<ProductId>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
        }
    }
}

/// Most-recently-viewed list, newest first, at most [`HISTORY_CAPACITY`] long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowsingHistory {
    pub products: Vec<ViewedProduct>,
}

impl BrowsingHistory {
    /// Record a view: any earlier entry for the same product is dropped, the
    /// product moves to the front, and the oldest entry falls off past capacity.
    pub fn record(&mut self, product: ViewedProduct) {
        self.products.retain(|p| p.id != product.id);
        self.products.insert(0, product);
        self.products.truncate(HISTORY_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
