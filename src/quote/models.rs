use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pricing::{ShipmentPricingRequest, VehicleType};
use crate::quote::QuoteError;

/// Body sent to the authoritative pricing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub vehicle_type: VehicleType,
    pub distance_miles: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    pub is_accident_recovery: bool,
    pub vehicle_count: u32,
    pub surge_multiplier: f64,
}

impl QuoteRequest {
    pub fn new(request: &ShipmentPricingRequest, distance_miles: f64, context: &QuoteContext) -> Self {
        Self {
            vehicle_type: request.vehicle(),
            distance_miles,
            pickup_date: context.pickup_date,
            delivery_date: context.delivery_date,
            is_accident_recovery: request.is_accident_recovery,
            vehicle_count: request.effective_vehicle_count(),
            surge_multiplier: request.effective_surge_multiplier(),
        }
    }
}

/// Per-call facts that are not part of the pricing request itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteContext {
    pub pickup_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    /// Bearer token of the host application's session
    pub auth_token: Option<String>,
}

impl QuoteContext {
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_dates(mut self, pickup: Option<NaiveDate>, delivery: Option<NaiveDate>) -> Self {
        self.pickup_date = pickup;
        self.delivery_date = delivery;
        self
    }

    /// Non-blank token, if any
    pub fn token(&self) -> Option<&str> {
        self.auth_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Price returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendQuote {
    pub total: f64,
    pub breakdown: Value,
}

/// Parse a backend response body
///
/// Accepts `{total, breakdown}` directly or wrapped in a `{data: ...}`
/// envelope. The total must be a finite, non-negative number and the
/// breakdown an object.
pub fn parse_quote_body(body: &[u8]) -> Result<BackendQuote, QuoteError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| QuoteError::Malformed(e.to_string()))?;

    let payload = match value.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => &value,
    };

    let total = payload
        .get("total")
        .and_then(Value::as_f64)
        .filter(|t| t.is_finite() && *t >= 0.0)
        .ok_or_else(|| QuoteError::Malformed("missing or invalid `total`".to_string()))?;

    let breakdown = payload
        .get("breakdown")
        .filter(|b| b.is_object())
        .cloned()
        .ok_or_else(|| QuoteError::Malformed("missing or invalid `breakdown`".to_string()))?;

    Ok(BackendQuote { total, breakdown })
}
