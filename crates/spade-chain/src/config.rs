use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ConfigError;

const DAEMON_TOKEN_ENV: &str = "LOTUS_DAEMON_AUTH_TOKEN";
const MINER_TOKEN_ENV: &str = "LOTUS_MINER_AUTH_TOKEN";

/// Connection settings for the Lotus daemon and miner APIs.
///
/// **Secret handling**: API tokens can be set in configuration or supplied via
/// environment variables, which are only consulted when the config leaves the
/// token unset:
/// - `LOTUS_DAEMON_AUTH_TOKEN` - daemon API token (needs `sign` permission)
/// - `LOTUS_MINER_AUTH_TOKEN` - miner API token (read permission is enough)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LotusConfigRaw {
    /// Lotus daemon JSON-RPC endpoint (e.g. "http://127.0.0.1:1234/rpc/v1").
    pub daemon_url: String,

    /// Bearer token for the daemon API.
    pub daemon_auth_token: Option<String>,

    /// Lotus miner JSON-RPC endpoint (e.g. "http://127.0.0.1:2345/rpc/v0").
    pub miner_url: String,

    /// Bearer token for the miner API.
    pub miner_auth_token: Option<String>,

    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Maximum tolerated lag, in epochs, before startup is refused.
    pub max_behind_epochs: u64,

    /// Unix timestamp of the network's genesis block.
    pub genesis_timestamp: i64,

    /// Seconds between epochs.
    pub block_delay_secs: u64,

    /// Depth at which a tipset is considered final when reading miner info.
    pub finality_epochs: i64,
}

/// Validated Lotus configuration with both tokens present.
#[derive(Debug, Clone)]
pub struct LotusConfig {
    pub daemon_url: String,
    pub daemon_auth_token: String,
    pub miner_url: String,
    pub miner_auth_token: String,
    pub request_timeout: Duration,
    pub max_behind_epochs: u64,
    pub genesis_timestamp: i64,
    pub block_delay_secs: u64,
    pub finality_epochs: i64,
}

impl LotusConfigRaw {
    pub fn resolve(self) -> Result<LotusConfig, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` for environment fallbacks.
    pub fn resolve_with<F>(self, lookup: F) -> Result<LotusConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        ensure_url("daemon_url", &self.daemon_url)?;
        ensure_url("miner_url", &self.miner_url)?;

        if self.block_delay_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "block_delay_secs must be greater than 0".to_string(),
            ));
        }
        if self.finality_epochs < 0 {
            return Err(ConfigError::InvalidConfig(
                "finality_epochs must not be negative".to_string(),
            ));
        }

        let daemon_auth_token = secret(self.daemon_auth_token, DAEMON_TOKEN_ENV, &lookup)
            .ok_or_else(|| {
                ConfigError::MissingSecret(format!(
                    "{DAEMON_TOKEN_ENV} env var or daemon_auth_token config required"
                ))
            })?;
        let miner_auth_token =
            secret(self.miner_auth_token, MINER_TOKEN_ENV, &lookup).ok_or_else(|| {
                ConfigError::MissingSecret(format!(
                    "{MINER_TOKEN_ENV} env var or miner_auth_token config required"
                ))
            })?;

        Ok(LotusConfig {
            daemon_url: self.daemon_url,
            daemon_auth_token,
            miner_url: self.miner_url,
            miner_auth_token,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_behind_epochs: self.max_behind_epochs,
            genesis_timestamp: self.genesis_timestamp,
            block_delay_secs: self.block_delay_secs,
            finality_epochs: self.finality_epochs,
        })
    }
}

fn ensure_url(field: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidConfig(format!("{field} '{value}' is not a valid URL: {e}")))
}

fn secret<F>(configured: Option<String>, env_name: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .filter(|token| !token.trim().is_empty())
        .or_else(|| lookup(env_name).filter(|token| !token.trim().is_empty()))
}
