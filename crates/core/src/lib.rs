//! Amazona Core - Shared types library.
//!
//! This crate provides the types shared by every Amazona component:
//! - `storefront` - Cart and history stores, the pricing service
//! - `cli` - Command-line client driving the stores
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no database access, no HTTP clients. Anything asynchronous (pricing
//! round trips, snapshot persistence) lives in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Line items, carts, pricing records and browsing history

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
