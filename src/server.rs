use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    config::Config,
    handlers::{self, AppState},
    metrics,
    quote::{HttpQuoteBackend, QuoteBackend},
    resolver::PriceResolver,
};

/// Request bodies are small JSON documents
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Start the pricing server
///
/// Installs metrics when enabled, builds the resolver from the backend
/// section, then serves until SIGINT or SIGTERM.
pub async fn start_server(config: Config) -> Result<()> {
    let metrics_route = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        let handle = Arc::new(metrics::init_metrics()?);
        Some((config.metrics.endpoint.clone(), handle))
    } else {
        None
    };

    let resolver = Arc::new(build_resolver(&config)?);
    let state = AppState::new(resolver, config.backend.service_token.clone());

    let app = create_router(state, metrics_route);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting DriveDrop pricing service on {}", addr);
    info!(
        backend_enabled = config.backend.enabled,
        debounce_ms = config.estimator.debounce_ms,
        quote_ttl_minutes = config.estimator.quote_ttl_minutes,
        "Configuration loaded"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Resolver wired to the configured backend, if any
pub fn build_resolver(config: &Config) -> Result<PriceResolver> {
    let backend: Option<Arc<dyn QuoteBackend>> = if config.backend.enabled {
        let client = HttpQuoteBackend::from_config(&config.backend)?;
        info!(endpoint = client.endpoint(), "Backend pricing enabled");
        Some(Arc::new(client))
    } else {
        info!("Backend pricing disabled, serving local estimates only");
        None
    };

    Ok(PriceResolver::new(backend, config.estimator.quote_ttl()))
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState, metrics: Option<(String, Arc<PrometheusHandle>)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/v1/pricing/estimate", post(handlers::pricing::estimate))
        .route("/v1/pricing/quote", post(handlers::pricing::quote))
        .with_state(state);

    if let Some((endpoint, handle)) = metrics {
        let metrics_routes = Router::new()
            .route(&endpoint, get(handlers::metrics_handler::metrics))
            .with_state(handle);
        app = app.merge(metrics_routes);
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to setup SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, initiating graceful shutdown"),
        _ = terminate => info!("SIGTERM received, initiating graceful shutdown"),
    }
}
