use anyhow::Result;
use colored::Colorize;
use drivedrop_pricing::{
    config,
    pricing::ShipmentPricingRequest,
    quote::QuoteContext,
    server,
    tracker::{PriceTracker, TrackedPrice},
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

/// Execute the watch command
///
/// Reads one request JSON per line from stdin, as a form would emit on every
/// edit, and prints each price that survives the debounce as a JSON line.
pub async fn execute(config_path: &Path, token: Option<String>) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let resolver = Arc::new(server::build_resolver(&cfg)?);
    let tracker = Arc::new(PriceTracker::new(resolver, cfg.estimator.debounce()));

    let mut context = QuoteContext::default();
    if let Some(token) = token.or_else(|| cfg.backend.service_token.clone()) {
        context = context.with_token(token);
    }

    eprintln!(
        "{} {}ms debounce, one request per line",
        "Watching stdin:".cyan(),
        cfg.estimator.debounce_ms
    );

    let published = run(tracker, BufReader::new(tokio::io::stdin()), context, |tracked| {
        match serde_json::to_string(&tracked.price) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!(error = %e, "Failed to serialize price"),
        }
    })
    .await?;

    eprintln!("{} {} price(s) published", "Done:".green(), published.len());
    Ok(())
}

/// Submit every input line to the tracker and collect what gets published
///
/// Lines that are blank or not a valid request are skipped.
async fn run<R, F>(
    tracker: Arc<PriceTracker>,
    input: R,
    context: QuoteContext,
    on_publish: F,
) -> Result<Vec<Arc<TrackedPrice>>>
where
    R: AsyncBufRead + Unpin,
    F: Fn(&TrackedPrice) + Send + Sync + 'static,
{
    let on_publish = Arc::new(on_publish);
    let mut lines = input.lines();
    let mut handles = Vec::new();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let request: ShipmentPricingRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Skipping invalid request line");
                continue;
            }
        };

        let tracker = Arc::clone(&tracker);
        let context = context.clone();
        let on_publish = Arc::clone(&on_publish);
        handles.push(tokio::spawn(async move {
            let tracked = tracker.submit(request, context).await;
            if let Some(tracked) = &tracked {
                on_publish(tracked);
            }
            tracked
        }));
    }

    let mut published = Vec::new();
    for handle in handles {
        if let Some(tracked) = handle.await? {
            published.push(tracked);
        }
    }

    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivedrop_pricing::resolver::{PriceResolver, PriceSource};
    use std::time::Duration;

    fn tracker(debounce_ms: u64) -> Arc<PriceTracker> {
        Arc::new(PriceTracker::new(
            Arc::new(PriceResolver::local_only()),
            Duration::from_millis(debounce_ms),
        ))
    }

    #[tokio::test]
    async fn test_burst_of_edits_publishes_only_the_last() {
        let input: &[u8] = b"{\"vehicleType\":\"sedan\",\"pickupState\":\"CA\",\"deliveryState\":\"CA\"}\n\
            {\"vehicleType\":\"sedan\",\"pickupState\":\"CA\",\"deliveryState\":\"NV\"}\n\
            {\"vehicleType\":\"suv\",\"pickupZip\":\"90210\",\"deliveryZip\":\"90210\"}\n";

        let published = run(tracker(50), input, QuoteContext::default(), |_| {})
            .await
            .unwrap();

        assert_eq!(published.len(), 1);
        assert_eq!(published[0].sequence, 3);
        assert_eq!(published[0].price.source, PriceSource::Estimate);
        assert_eq!(published[0].price.total(), 50.0);
    }

    #[tokio::test]
    async fn test_invalid_and_blank_lines_are_skipped() {
        let input: &[u8] = b"not json\n\n{\"vehicleType\":\"truck\",\"pickupZip\":\"10001\",\"deliveryZip\":\"10001\"}\n";
        let tracker = tracker(0);

        let published = run(Arc::clone(&tracker), input, QuoteContext::default(), |_| {})
            .await
            .unwrap();

        // 25 mi at the truck short rate
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].price.total(), 55.0);
        assert_eq!(tracker.latest_sequence(), 1);
    }
}
