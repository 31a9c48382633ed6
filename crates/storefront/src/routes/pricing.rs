//! Pricing API handler.
//!
//! The trusted side of every cart mutation: store clients post their
//! candidate item list and commit whatever comes back.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::instrument;

use amazona_core::{PricingRequest, PricingSummary};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Price a candidate cart.
///
/// Malformed bodies and invalid item lists are rejected with 400.
#[instrument(skip(state, payload))]
pub async fn resolve(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PricingRequest>, JsonRejection>,
) -> Result<Json<PricingSummary>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    tracing::debug!(
        lines = request.items.len(),
        delivery_date_index = ?request.delivery_date_index,
        "Pricing request"
    );

    let summary = state.resolver().price(&request)?;
    Ok(Json(summary))
}
