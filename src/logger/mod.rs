//! Tracing subscriber and Prometheus exporter for the client.
//!
//! `RUST_LOG` takes precedence over `[logger].level`. HTTP and JSON-RPC
//! transport crates are held at `warn` unless the configured level names
//! them.

mod config;

use std::net::SocketAddr;

pub(crate) use config::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const TRANSPORT_CRATES: [&str; 4] = ["hyper", "hyper_util", "reqwest", "jsonrpsee"];

pub(crate) fn initialize(logger_config: &LoggerConfig, telemetry_config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&logger_config.level)));

    let output = match logger_config.format {
        LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .init();

    if let Some(listener) = metrics_listener(&telemetry_config.metrics) {
        install_metrics_exporter(listener);
    }
}

/// Configured level plus `=warn` for transport crates it does not mention.
fn filter_directives(level: &str) -> String {
    let mut directives = level.trim().to_string();
    for krate in TRANSPORT_CRATES {
        let mentioned = directives
            .split(',')
            .any(|directive| directive.trim().split('=').next() == Some(krate));
        if !mentioned {
            if !directives.is_empty() {
                directives.push(',');
            }
            directives.push_str(krate);
            directives.push_str("=warn");
        }
    }
    directives
}

/// Scrape address when the exporter is enabled and the address parses.
fn metrics_listener(metrics_config: &TelemetryMetricsConfig) -> Option<SocketAddr> {
    if !metrics_config.enabled {
        return None;
    }

    match metrics_config.bind_address.parse() {
        Ok(address) => Some(address),
        Err(error) => {
            tracing::warn!(
                bind_address = %metrics_config.bind_address,
                error = %error,
                "Invalid metrics bind address; metrics exporter disabled"
            );
            None
        }
    }
}

fn install_metrics_exporter(listener: SocketAddr) {
    if let Err(error) = PrometheusBuilder::new()
        .with_http_listener(listener)
        .install()
    {
        tracing::warn!(
            bind_address = %listener,
            error = %error,
            "Failed to start Prometheus exporter; continuing without metrics"
        );
        return;
    }
    tracing::info!(bind_address = %listener, "Serving Prometheus metrics");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(enabled: bool, bind_address: &str) -> TelemetryMetricsConfig {
        TelemetryMetricsConfig {
            enabled,
            bind_address: bind_address.to_string(),
        }
    }

    #[test]
    fn transport_crates_are_quieted() {
        assert_eq!(
            filter_directives("spade_client=debug"),
            "spade_client=debug,hyper=warn,hyper_util=warn,reqwest=warn,jsonrpsee=warn"
        );
    }

    #[test]
    fn explicit_transport_levels_are_kept() {
        assert_eq!(
            filter_directives("info,reqwest=trace"),
            "info,reqwest=trace,hyper=warn,hyper_util=warn,jsonrpsee=warn"
        );
    }

    #[test]
    fn metrics_listener_requires_enabled_and_valid_address() {
        assert_eq!(metrics_listener(&metrics(false, "127.0.0.1:9464")), None);
        assert_eq!(metrics_listener(&metrics(true, "localhost")), None);
        assert_eq!(
            metrics_listener(&metrics(true, "127.0.0.1:9464")),
            Some(SocketAddr::from(([127, 0, 0, 1], 9464)))
        );
    }
}
