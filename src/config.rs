use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Authoritative pricing endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_quote_path")]
    pub quote_path: String,

    /// Upper bound on one quote request (default: 10)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Used when the caller does not forward its own session token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            quote_path: default_quote_path(),
            timeout_seconds: default_timeout_seconds(),
            service_token: None,
        }
    }
}

impl BackendConfig {
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.quote_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EstimatorConfig {
    /// Quiet period after the last input change before pricing (default: 500)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How long a resolved price stays valid (default: 30)
    #[serde(default = "default_quote_ttl_minutes")]
    pub quote_ttl_minutes: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            quote_ttl_minutes: default_quote_ttl_minutes(),
        }
    }
}

impl EstimatorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn quote_ttl(&self) -> Duration {
        Duration::from_secs(self.quote_ttl_minutes * 60)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            endpoint: default_metrics_endpoint(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_quote_path() -> String {
    "/functions/v1/calculate-quote".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_quote_ttl_minutes() -> u64 {
    30
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_endpoint() -> String {
    "/metrics".to_string()
}

/// Load configuration from a TOML file, overridden by `DRIVEDROP__*` env vars
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("DRIVEDROP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(contents, config::FileFormat::Toml))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}': expected 'text' or 'json'", other),
    }

    if cfg.backend.enabled {
        if cfg.backend.base_url.trim().is_empty() {
            anyhow::bail!("Backend pricing is enabled but base_url is empty");
        }
        if !cfg.backend.base_url.starts_with("http://") && !cfg.backend.base_url.starts_with("https://") {
            anyhow::bail!("Backend base_url must start with http:// or https://");
        }
    }

    if !cfg.backend.quote_path.starts_with('/') {
        anyhow::bail!("Backend quote_path must start with '/'");
    }

    if cfg.backend.timeout_seconds == 0 {
        anyhow::bail!("Backend timeout_seconds must be >= 1");
    }

    if cfg.estimator.quote_ttl_minutes == 0 {
        anyhow::bail!("Estimator quote_ttl_minutes must be >= 1");
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!("Metrics endpoint must start with '/'");
    }

    Ok(())
}
