//! Amazona Storefront library.
//!
//! Client-side stores and the trusted pricing service:
//!
//! - [`cart`] - Cart store; every mutation is priced by a resolver and
//!   persisted as a whole snapshot
//! - [`history`] - Browsing history store
//! - [`pricing`] - Resolver contract, server-side policy, HTTP client
//! - [`storage`] - Snapshot backends (memory, files, `PostgreSQL`)
//! - [`routes`] - `POST /api/pricing` and health checks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod middleware;
pub mod pricing;
pub mod routes;
pub mod state;
pub mod storage;

pub use cart::{CartError, CartStore};
pub use history::BrowsingHistoryStore;
