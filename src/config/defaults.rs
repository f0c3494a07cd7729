//! Typed default configurations for each environment.
//!
//! Each environment (development, mainnet) gets a fully constructed
//! [`ConfigRaw`] via [`config_for`]. Files and environment variables are
//! layered on top by the loader.

use spade_api::SpadeApiConfig;
use spade_chain::LotusConfigRaw;

use super::{ConfigError, ConfigRaw};
use crate::{
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
    periodic_tasks::ReservationConfig,
};

pub(crate) const ENVIRONMENTS: [&str; 2] = ["development", "mainnet"];

/// Mainnet genesis, 2020-08-24 22:00:00 UTC.
const MAINNET_GENESIS_TIMESTAMP: i64 = 1_598_306_400;

/// Returns the default [`ConfigRaw`] for the given environment name.
pub(crate) fn config_for(environment: &str) -> Result<ConfigRaw, ConfigError> {
    match environment {
        "development" => Ok(development()),
        "mainnet" => Ok(mainnet()),
        _ => Err(ConfigError::UnknownEnvironment(environment.to_string())),
    }
}

// ── Shared defaults ─────────────────────────────────────────────

fn lotus() -> LotusConfigRaw {
    LotusConfigRaw {
        daemon_url: "http://127.0.0.1:1234/rpc/v1".to_string(),
        daemon_auth_token: None,
        miner_url: "http://127.0.0.1:2345/rpc/v0".to_string(),
        miner_auth_token: None,
        request_timeout_ms: 30_000,
        max_behind_epochs: 5,
        genesis_timestamp: MAINNET_GENESIS_TIMESTAMP,
        block_delay_secs: 30,
        finality_epochs: 900,
    }
}

fn spade(url: &str) -> SpadeApiConfig {
    SpadeApiConfig {
        url: url.to_string(),
        insecure_skip_verify: false,
        request_timeout_ms: 30_000,
        eligible_cache_ttl_secs: 10,
    }
}

fn reservation(enabled: bool) -> ReservationConfig {
    ReservationConfig {
        enabled,
        interval_secs: 60,
        pending_proposals_interval_secs: 600,
    }
}

fn telemetry(metrics_enabled: bool) -> TelemetryConfig {
    TelemetryConfig {
        metrics: TelemetryMetricsConfig {
            enabled: metrics_enabled,
            bind_address: "127.0.0.1:9464".to_string(),
        },
    }
}

// ── Per-environment constructors ────────────────────────────────

fn development() -> ConfigRaw {
    ConfigRaw {
        environment: "development".to_string(),
        lotus: lotus(),
        spade: spade("http://127.0.0.1:8080/sp"),
        reservation: reservation(false),
        logger: LoggerConfig {
            level: "spade_client=debug,spade_api=debug,spade_chain=debug".to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: telemetry(false),
    }
}

fn mainnet() -> ConfigRaw {
    ConfigRaw {
        environment: "mainnet".to_string(),
        lotus: lotus(),
        spade: spade("https://api.spade.storage/sp"),
        reservation: reservation(true),
        logger: LoggerConfig {
            level: "spade_client=info,spade_api=info,spade_chain=info".to_string(),
            format: LogFormat::Json,
        },
        telemetry: telemetry(true),
    }
}
