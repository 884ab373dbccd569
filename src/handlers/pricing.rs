use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AppError;
use crate::handlers::AppState;
use crate::pricing::{PricingData, ShipmentPricingRequest};
use crate::quote::QuoteContext;
use crate::resolver::ResolvedPrice;

/// Body of `POST /v1/pricing/quote`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    pub request: ShipmentPricingRequest,
    #[serde(default)]
    pub pickup_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

/// Handle /v1/pricing/estimate endpoint
pub async fn estimate(
    State(state): State<AppState>,
    payload: Result<Json<ShipmentPricingRequest>, JsonRejection>,
) -> Result<Json<PricingData>, AppError> {
    let Json(request) = payload?;

    let data = state.resolver.estimate(&request);

    debug!(
        vehicle_type = request.vehicle().as_str(),
        miles = data.distance.miles,
        basis = ?data.distance.basis,
        total = data.estimate.total,
        "Computed pricing estimate"
    );

    Ok(Json(data))
}

/// Handle /v1/pricing/quote endpoint
///
/// Uses the caller's bearer token for the backend call, falling back to the
/// configured service token.
pub async fn quote(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<QuotePayload>, JsonRejection>,
) -> Result<Json<ResolvedPrice>, AppError> {
    let Json(payload) = payload?;

    let token = match headers.get("Authorization") {
        Some(value) => {
            let header = value
                .to_str()
                .map_err(|_| AppError::Unauthorized("Authorization header is not valid text".to_string()))?;
            Some(extract_bearer_token(header)?.to_string())
        }
        None => state.service_token.clone(),
    };

    let mut context = QuoteContext::default().with_dates(payload.pickup_date, payload.delivery_date);
    if let Some(token) = token {
        context = context.with_token(token);
    }

    let resolved = state.resolver.resolve(&payload.request, &context).await;

    info!(
        source = resolved.source.as_str(),
        total = resolved.total(),
        confidence = resolved.estimate.confidence.as_str(),
        "Resolved price"
    );

    Ok(Json(resolved))
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    const BEARER_PREFIX: &str = "Bearer ";

    let Some(token) = auth_header.strip_prefix(BEARER_PREFIX) else {
        return Err(AppError::Unauthorized(
            "Authorization header must use Bearer scheme".to_string(),
        ));
    };

    if token.trim().is_empty() {
        return Err(AppError::Unauthorized("Bearer token is empty".to_string()));
    }

    Ok(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Confidence;
    use crate::resolver::{PriceResolver, PriceSource};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Arc::new(PriceResolver::local_only()), None)
    }

    #[test]
    fn test_extract_bearer_token_success() {
        assert_eq!(extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
    }

    #[test]
    fn test_extract_bearer_token_rejects_other_schemes() {
        assert!(matches!(
            extract_bearer_token("Basic dXNlcg=="),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            extract_bearer_token("Bearer "),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_estimate_handler() {
        let request = ShipmentPricingRequest::new("sedan").with_states("CA", "NV");
        let Json(data) = estimate(State(state()), Ok(Json(request))).await.unwrap();

        // 800 mi mid band at 0.95/mi
        assert_eq!(data.estimate.total, 760.0);
        assert_eq!(data.estimate.confidence, Confidence::Low);
    }

    #[tokio::test]
    async fn test_quote_handler_without_backend() {
        let payload = QuotePayload {
            request: ShipmentPricingRequest::new("suv").with_zips("90210", "90210"),
            pickup_date: None,
            delivery_date: None,
        };

        let Json(resolved) = quote(State(state()), HeaderMap::new(), Ok(Json(payload)))
            .await
            .unwrap();

        assert_eq!(resolved.source, PriceSource::Estimate);
        assert_eq!(resolved.total(), 50.0);
    }

    #[tokio::test]
    async fn test_quote_handler_rejects_basic_auth() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Basic abc".parse().unwrap());
        let payload = QuotePayload {
            request: ShipmentPricingRequest::new("sedan"),
            pickup_date: None,
            delivery_date: None,
        };

        let result = quote(State(state()), headers, Ok(Json(payload))).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
