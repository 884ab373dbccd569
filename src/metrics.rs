use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::pricing::Confidence;
use crate::resolver::PriceSource;

/// Install the Prometheus recorder
///
/// Fails if a recorder is already installed for this process.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

fn init_metric_descriptions() {
    describe_counter!(
        "pricing_estimates_total",
        "Local price estimates computed, by confidence"
    );
    describe_counter!(
        "pricing_quotes_total",
        "Resolved prices, by the layer that produced them"
    );
    describe_counter!(
        "pricing_backend_failures_total",
        "Backend quote attempts that fell back to the local estimate"
    );
    describe_histogram!(
        "pricing_backend_duration_seconds",
        "Backend quote request duration in seconds"
    );
    describe_gauge!(
        "pricing_service_info",
        "Pricing service version information"
    );

    gauge!("pricing_service_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

pub fn record_estimate(confidence: Confidence) {
    counter!("pricing_estimates_total", "confidence" => confidence.as_str()).increment(1);
}

pub fn record_quote_source(source: PriceSource) {
    counter!("pricing_quotes_total", "source" => source.as_str()).increment(1);
}

pub fn record_backend_failure(kind: &'static str) {
    counter!("pricing_backend_failures_total", "kind" => kind).increment(1);
}

pub fn record_backend_duration(duration: Duration) {
    histogram!("pricing_backend_duration_seconds").record(duration.as_secs_f64());
}
