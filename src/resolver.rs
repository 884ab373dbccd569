//! Layered price resolution
//!
//! The authoritative backend quote wins whenever it is available. Otherwise
//! the local progressive estimate is used, and when the request carried no
//! usable location data at all the result is marked as the fixed heuristic
//! (the 500 mile fallback).
//! The producing layer is always reported in [`ResolvedPrice::source`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::metrics;
use crate::pricing::{
    price_range, Confidence, DistanceBasis, DistanceEstimate, EstimateType, PriceCalculator,
    PriceEstimate, PricingBreakdown, PricingData, PricingFactors, ShipmentPricingRequest,
};
use crate::quote::{BackendQuote, QuoteBackend, QuoteContext, QuoteError, QuoteRequest};

/// Default validity of a resolved price
pub const DEFAULT_QUOTE_TTL: Duration = Duration::from_secs(30 * 60);

/// Which layer produced a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Backend,
    Estimate,
    Heuristic,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Estimate => "estimate",
            Self::Heuristic => "heuristic",
        }
    }
}

/// Breakdown as computed locally, or as returned verbatim by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedBreakdown {
    Local(PricingBreakdown),
    Backend(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    pub source: PriceSource,
    pub estimate: PriceEstimate,
    pub breakdown: ResolvedBreakdown,
    pub distance: DistanceEstimate,
    pub factors: PricingFactors,
    pub expires_at: DateTime<Utc>,
}

impl ResolvedPrice {
    pub fn total(&self) -> f64 {
        self.estimate.total
    }
}

pub struct PriceResolver {
    calculator: PriceCalculator,
    backend: Option<Arc<dyn QuoteBackend>>,
    quote_ttl: Duration,
}

impl PriceResolver {
    pub fn new(backend: Option<Arc<dyn QuoteBackend>>, quote_ttl: Duration) -> Self {
        Self {
            calculator: PriceCalculator::new(),
            backend,
            quote_ttl,
        }
    }

    /// Resolver that never calls out
    pub fn local_only() -> Self {
        Self::new(None, DEFAULT_QUOTE_TTL)
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Pure local estimate
    pub fn estimate(&self, request: &ShipmentPricingRequest) -> PricingData {
        let data = self.calculator.estimate(request);
        metrics::record_estimate(data.estimate.confidence);
        data
    }

    /// Resolve through backend, local estimate and heuristic, in that order
    ///
    /// Never fails: backend problems are logged and degrade to the local layers.
    pub async fn resolve(&self, request: &ShipmentPricingRequest, context: &QuoteContext) -> ResolvedPrice {
        let local = self.estimate(request);

        let resolved = match self.fetch_backend(request, &local, context).await {
            Some(Ok(quote)) => self.from_backend(quote, &local),
            Some(Err(e)) => {
                warn!(
                    error = %e,
                    kind = e.kind(),
                    "Backend pricing unavailable, falling back to local estimate"
                );
                metrics::record_backend_failure(e.kind());
                self.from_local(local)
            }
            None => self.from_local(local),
        };

        metrics::record_quote_source(resolved.source);
        resolved
    }

    /// Local layers only, without touching the backend
    pub fn resolve_local(&self, request: &ShipmentPricingRequest) -> ResolvedPrice {
        let local = self.estimate(request);
        self.from_local(local)
    }

    /// `None` when no backend is configured
    async fn fetch_backend(
        &self,
        request: &ShipmentPricingRequest,
        local: &PricingData,
        context: &QuoteContext,
    ) -> Option<Result<BackendQuote, QuoteError>> {
        let backend = self.backend.as_ref()?;

        let Some(token) = context.token() else {
            return Some(Err(QuoteError::MissingToken));
        };

        let quote_request = QuoteRequest::new(request, local.distance.miles, context);
        let started = Instant::now();
        let result = backend.fetch_quote(&quote_request, token).await;
        metrics::record_backend_duration(started.elapsed());

        debug!(
            backend = backend.name(),
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Backend quote finished"
        );

        Some(result)
    }

    fn from_backend(&self, quote: BackendQuote, local: &PricingData) -> ResolvedPrice {
        ResolvedPrice {
            source: PriceSource::Backend,
            estimate: PriceEstimate {
                total: quote.total,
                range: price_range(quote.total, Confidence::High),
                confidence: Confidence::High,
                kind: EstimateType::Quote,
            },
            breakdown: ResolvedBreakdown::Backend(quote.breakdown),
            distance: local.distance,
            factors: local.factors,
            expires_at: self.expires_at(),
        }
    }

    /// Without any usable location data the local figure is the fixed heuristic
    fn from_local(&self, local: PricingData) -> ResolvedPrice {
        let source = if local.distance.basis == DistanceBasis::Default {
            PriceSource::Heuristic
        } else {
            PriceSource::Estimate
        };
        self.wrap_local(source, local)
    }

    fn wrap_local(&self, source: PriceSource, data: PricingData) -> ResolvedPrice {
        ResolvedPrice {
            source,
            estimate: data.estimate,
            breakdown: ResolvedBreakdown::Local(data.breakdown),
            distance: data.distance,
            factors: data.factors,
            expires_at: self.expires_at(),
        }
    }

    fn expires_at(&self) -> DateTime<Utc> {
        let ttl = chrono::Duration::from_std(self.quote_ttl).unwrap_or(chrono::Duration::zero());
        Utc::now() + ttl
    }
}
