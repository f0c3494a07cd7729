use serde::{Deserialize, Serialize};
use spade_api::SpadeApiConfig;
use spade_chain::{LotusConfig, LotusConfigRaw};
use url::Url;

use crate::{
    config::ConfigError,
    logger::{LoggerConfig, TelemetryConfig},
    periodic_tasks::ReservationConfig,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub environment: String,
    pub lotus: LotusConfigRaw,
    pub spade: SpadeApiConfig,
    pub reservation: ReservationConfig,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub environment: String,
    pub lotus: LotusConfig,
    pub spade: SpadeApiConfig,
    pub reservation: ReservationConfig,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        validate_spade(&self.spade)?;
        validate_reservation(&self.reservation)?;

        Ok(Config {
            environment: self.environment,
            lotus: self.lotus.resolve()?,
            spade: self.spade,
            reservation: self.reservation,
            logger: self.logger,
            telemetry: self.telemetry,
        })
    }
}

fn validate_spade(spade: &SpadeApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&spade.url).map_err(|e| {
        ConfigError::InvalidConfig(format!("spade.url '{}' is not a valid URL: {e}", spade.url))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidConfig(format!(
            "spade.url must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if spade.request_timeout_ms == 0 {
        return Err(ConfigError::InvalidConfig(
            "spade.request_timeout_ms must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_reservation(reservation: &ReservationConfig) -> Result<(), ConfigError> {
    if reservation.interval_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "reservation.interval_secs must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
