use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::AppError;
use crate::logging::SensitiveToken;
use crate::quote::models::{parse_quote_body, BackendQuote, QuoteRequest};

/// Why the backend price could not be used
///
/// Every variant means the same thing to callers, "unavailable"; the
/// distinction only feeds logs and metrics.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("no session token available for backend pricing")]
    MissingToken,

    #[error("backend pricing timed out after {0:?}")]
    Timeout(Duration),

    #[error("backend pricing request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("backend pricing returned HTTP {0}")]
    Status(u16),

    #[error("backend pricing response was malformed: {0}")]
    Malformed(String),
}

impl QuoteError {
    /// Stable label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::Status(_) => "status",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Source of authoritative quotes
///
/// Injected into the resolver so the estimator can be exercised without a
/// network.
#[async_trait]
pub trait QuoteBackend: Send + Sync + 'static {
    /// Short name for logs
    fn name(&self) -> &str;

    async fn fetch_quote(&self, request: &QuoteRequest, token: &str) -> Result<BackendQuote, QuoteError>;
}

/// Quote backend reached over HTTP with a bearer token
pub struct HttpQuoteBackend {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpQuoteBackend {
    pub fn new(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(client, config.endpoint(), config.timeout()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, error: reqwest::Error) -> QuoteError {
        if error.is_timeout() {
            QuoteError::Timeout(self.timeout)
        } else {
            QuoteError::Transport(error)
        }
    }
}

#[async_trait]
impl QuoteBackend for HttpQuoteBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_quote(&self, request: &QuoteRequest, token: &str) -> Result<BackendQuote, QuoteError> {
        if token.trim().is_empty() {
            return Err(QuoteError::MissingToken);
        }

        debug!(
            endpoint = %self.endpoint,
            token = %SensitiveToken::new(token),
            vehicle_type = request.vehicle_type.as_str(),
            distance_miles = request.distance_miles,
            "Requesting backend quote"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        parse_quote_body(&body)
    }
}
