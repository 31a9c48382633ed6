//! Server-side pricing policy.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use amazona_core::{
    AVAILABLE_DELIVERY_DATES, DeliveryDate, LineItem, PricingRequest, PricingSummary, round2,
};

use super::{PricingError, PricingResolver};

/// Tax and shipping rules applied by [`PolicyResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Sales tax rate applied to the items subtotal (e.g. `0.15`).
    pub tax_rate: Decimal,
    /// Delivery options, fastest first; the last one is the default.
    pub delivery_dates: Vec<DeliveryDate>,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(15, 2),
            delivery_dates: AVAILABLE_DELIVERY_DATES.to_vec(),
        }
    }
}

impl PricingPolicy {
    /// Replace the free-shipping threshold of every option that has one.
    #[must_use]
    pub fn with_free_shipping_min(mut self, min_price: Decimal) -> Self {
        for option in &mut self.delivery_dates {
            if option.free_shipping_min_price > Decimal::ZERO {
                option.free_shipping_min_price = min_price;
            }
        }
        self
    }

    #[must_use]
    pub const fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }
}

/// Trusted resolver applying a [`PricingPolicy`] in-process.
#[derive(Debug, Clone)]
pub struct PolicyResolver {
    policy: PricingPolicy,
    clock: fn() -> DateTime<Utc>,
}

impl Default for PolicyResolver {
    fn default() -> Self {
        Self::new(PricingPolicy::default())
    }
}

impl PolicyResolver {
    #[must_use]
    pub fn new(policy: PricingPolicy) -> Self {
        Self {
            policy,
            clock: Utc::now,
        }
    }

    /// Use a fixed clock for delivery-date estimates.
    #[must_use]
    pub const fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Price a request synchronously.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidItems` if a line has a zero quantity or a
    /// negative price, the delivery index is out of range, or the totals overflow.
    pub fn price(&self, request: &PricingRequest) -> Result<PricingSummary, PricingError> {
        if request.items.is_empty() {
            return Ok(PricingSummary::empty());
        }

        let items_price = round2(items_subtotal(&request.items)?);

        let last = self.policy.delivery_dates.len().checked_sub(1).ok_or_else(|| {
            PricingError::InvalidItems("no delivery options configured".to_string())
        })?;
        let index = request.delivery_date_index.unwrap_or(last);
        let option = self.policy.delivery_dates.get(index).ok_or_else(|| {
            PricingError::InvalidItems(format!("delivery date index {index} out of range"))
        })?;

        let shipping_price = if option.ships_free(items_price) {
            Decimal::ZERO
        } else {
            option.shipping_price
        };
        let tax_price = round2(items_price * self.policy.tax_rate);
        let total_price = round2(items_price + shipping_price + tax_price);
        let expected_delivery_date =
            (self.clock)() + Duration::days(i64::from(option.days_to_deliver));

        debug!(
            lines = request.items.len(),
            %items_price,
            %total_price,
            delivery = option.name,
            "Priced cart"
        );

        Ok(PricingSummary {
            items_price,
            tax_price: Some(tax_price),
            shipping_price: Some(shipping_price),
            total_price,
            delivery_date_index: Some(index),
            expected_delivery_date: Some(expected_delivery_date),
        })
    }
}

#[async_trait]
impl PricingResolver for PolicyResolver {
    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    async fn resolve(&self, request: &PricingRequest) -> Result<PricingSummary, PricingError> {
        self.price(request)
    }
}

/// Sum of `unit_price * quantity` over all lines.
fn items_subtotal(items: &[LineItem]) -> Result<Decimal, PricingError> {
    items.iter().try_fold(Decimal::ZERO, |acc, line| {
        if line.quantity == 0 {
            return Err(PricingError::InvalidItems(format!(
                "line {} has zero quantity",
                line.key()
            )));
        }
        if line.unit_price.is_sign_negative() {
            return Err(PricingError::InvalidItems(format!(
                "line {} has a negative price",
                line.key()
            )));
        }
        line.unit_price
            .checked_mul(Decimal::from(line.quantity))
            .and_then(|amount| acc.checked_add(amount))
            .ok_or_else(|| PricingError::InvalidItems("cart total overflows".to_string()))
    })
}
