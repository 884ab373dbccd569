pub mod health;
pub mod metrics_handler;
pub mod pricing;

use std::sync::Arc;

use crate::resolver::PriceResolver;

/// Shared state for the pricing routes
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PriceResolver>,
    /// Token used for backend quotes when the caller sends none
    pub service_token: Option<String>,
}

impl AppState {
    pub fn new(resolver: Arc<PriceResolver>, service_token: Option<String>) -> Self {
        Self {
            resolver,
            service_token,
        }
    }
}
