use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use drivedrop_pricing::{config, pricing::ShipmentPricingRequest, quote::QuoteContext, server};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct EstimateOptions {
    pub file: Option<PathBuf>,
    pub quote: bool,
    pub token: Option<String>,
    pub pickup_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
}

/// Execute the estimate command
///
/// Prints the local `PricingData`, or with `--quote` the resolved price
/// from the configured layers, as pretty JSON on stdout.
pub async fn execute(config_path: &Path, options: EstimateOptions) -> Result<()> {
    let input = read_input(options.file.as_deref())?;
    let request: ShipmentPricingRequest =
        serde_json::from_str(&input).context("Failed to parse shipment pricing request")?;

    let cfg = config::load_config(config_path)?;
    let resolver = server::build_resolver(&cfg)?;

    let output = if options.quote {
        let token = options.token.or_else(|| cfg.backend.service_token.clone());
        let mut context = QuoteContext::default().with_dates(options.pickup_date, options.delivery_date);
        if let Some(token) = token {
            context = context.with_token(token);
        }

        let resolved = resolver.resolve(&request, &context).await;
        info!(source = resolved.source.as_str(), "Resolved price");
        eprintln!(
            "{} {} ({})",
            "Resolved via".cyan(),
            resolved.source.as_str().bold(),
            resolved.estimate.confidence.as_str()
        );
        serde_json::to_string_pretty(&resolved)?
    } else {
        let data = resolver.estimate(&request);
        eprintln!(
            "{} {} confidence",
            "Local estimate,".cyan(),
            data.estimate.confidence.as_str().bold()
        );
        serde_json::to_string_pretty(&data)?
    };

    println!("{}", output);
    Ok(())
}

/// Read the request from a file, or stdin when no file is given
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read request from stdin")?;
            Ok(input)
        }
    }
}
