//! Core types for Amazona.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod delivery;
pub mod history;
pub mod id;
pub mod line_item;
pub mod price;
pub mod pricing;

pub use cart::{Cart, CartChangeError};
pub use delivery::{AVAILABLE_DELIVERY_DATES, DeliveryDate};
pub use history::{BrowsingHistory, HISTORY_CAPACITY, ViewedProduct};
pub use id::*;
pub use line_item::{LineItem, LineKey};
pub use price::{format_price, round2};
pub use pricing::{PricingRequest, PricingSummary};
