//! HTTP route handlers for the pricing service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! POST /api/pricing            - Price a candidate cart item list
//! ```

pub mod pricing;

use axum::{
    Router,
    http::Request,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/pricing", post(pricing::resolve))
}

/// Build the full application router with tracing and request IDs.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
