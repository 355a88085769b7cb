use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;
use wx_config::ServiceConfig;

/// Histogram buckets, in seconds, for every `*_seconds` metric.
const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub service_name: String,
    pub environment: String,
    pub region: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub metrics_addr: Option<String>,
}

impl From<&ServiceConfig> for ObservabilityConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            service_name: config.service_name.clone(),
            environment: config.environment.to_string(),
            region: config.region.clone(),
            log_level: config.log_level.clone(),
            log_format: LogFormat::from_env(&config.log_format),
            metrics_addr: config.metrics_addr.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilityHandle {
    pub service_name: String,
    pub metrics_enabled: bool,
}

pub fn init(config: &ObservabilityConfig) -> ObservabilityHandle {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    // A second init (tests, embedded use) keeps the first subscriber.
    let _ = match config.log_format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(
            builder.json().flatten_event(true).finish(),
        ),
    };

    let metrics_enabled = match config.metrics_addr.as_deref() {
        Some(addr) => install_exporter(config, addr),
        None => false,
    };

    ObservabilityHandle {
        service_name: config.service_name.clone(),
        metrics_enabled,
    }
}

pub fn log_startup(handle: &ObservabilityHandle, config: &ObservabilityConfig) {
    tracing::info!(
        service = %handle.service_name,
        environment = %config.environment,
        region = config.region.as_deref().unwrap_or("unset"),
        log_format = ?config.log_format,
        metrics_enabled = handle.metrics_enabled,
        "Hazard matching service starting"
    );
}

fn install_exporter(config: &ObservabilityConfig, addr: &str) -> bool {
    match exporter(config, addr).and_then(|builder| builder.install().map_err(|err| err.to_string()))
    {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(
                service = %config.service_name,
                metrics_addr = addr,
                %error,
                "Prometheus exporter disabled"
            );
            false
        }
    }
}

fn exporter(config: &ObservabilityConfig, addr: &str) -> Result<PrometheusBuilder, String> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|err| format!("invalid WX_METRICS_ADDR: {err}"))?;

    let mut builder = PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", config.service_name.clone())
        .add_global_label("environment", config.environment.clone());
    if let Some(region) = &config.region {
        builder = builder.add_global_label("region", region.clone());
    }
    builder
        .set_buckets_for_metric(Matcher::Suffix("_seconds".to_string()), LATENCY_BUCKETS)
        .map_err(|err| err.to_string())
}
