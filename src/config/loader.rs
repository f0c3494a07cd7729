use std::path::{Path, PathBuf};

use clap::{Arg, Command};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::Deserialize;

use super::{Config, ConfigRaw, defaults};
use crate::config::ConfigError;

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "SPADE_CLIENT_";

#[derive(Debug, Deserialize)]
struct EnvironmentConfig {
    environment: Option<String>,
}

pub(crate) fn initialize_configuration() -> Result<Config, ConfigError> {
    let matches = Command::new("spade-client")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reserves Spade storage deals for a Filecoin storage provider")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.toml format)"),
        )
        .get_matches();

    let custom_config_path = matches.get_one::<String>("config").map(PathBuf::from);
    load_configuration(Path::new(DEFAULT_CONFIG_FILE), custom_config_path.as_deref())
}

/// Build configuration from layered sources, lowest priority first:
/// environment defaults, `base_config`, `custom_config`, then
/// `SPADE_CLIENT_*` environment variables (`__` separates nested keys).
pub(crate) fn load_configuration(
    base_config: &Path,
    custom_config: Option<&Path>,
) -> Result<Config, ConfigError> {
    let environment = resolve_environment(custom_config.unwrap_or(base_config))?;

    tracing::info!("Loading configuration for environment: {}", environment);

    let mut figment = Figment::from(Serialized::defaults(defaults::config_for(&environment)?));

    if base_config.exists() {
        figment = figment.merge(Toml::file(base_config));
    }

    if let Some(config_path) = custom_config {
        tracing::info!("Loading custom config file: {}", config_path.display());
        figment = figment.merge(Toml::file(config_path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: ConfigRaw = figment.extract().map_err(Box::new)?;
    if config.environment != environment {
        return Err(ConfigError::UnknownEnvironment(format!(
            "config environment '{}' does not match selected '{}'",
            config.environment, environment
        )));
    }

    config.resolve()
}

fn resolve_environment(config_path: &Path) -> Result<String, ConfigError> {
    if !config_path.exists() {
        return Err(ConfigError::MissingConfig(
            config_path.display().to_string(),
        ));
    }

    let env = read_environment_from(config_path).ok_or_else(|| {
        ConfigError::MissingEnvironment(
            "set environment = \"development|mainnet\" in your config".to_string(),
        )
    })?;

    if !defaults::ENVIRONMENTS.contains(&env.as_str()) {
        return Err(ConfigError::UnknownEnvironment(env));
    }

    Ok(env)
}

fn read_environment_from(path: &Path) -> Option<String> {
    Figment::from(Toml::file(path))
        .extract::<EnvironmentConfig>()
        .ok()
        .and_then(|config| config.environment)
        .map(|env| env.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::logger::LogFormat;

    const TOKENS: &str = r#"
[lotus]
daemon_auth_token = "daemon-token"
miner_auth_token = "miner-token"
"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn file_values_override_environment_defaults() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "config.toml",
            &format!(
                "environment = \"development\"\n{TOKENS}\n[spade]\nurl = \"https://spade.example.org/sp\"\n"
            ),
        );

        let config = load_configuration(&base, None).unwrap();

        assert_eq!(config.environment, "development");
        assert_eq!(config.spade.url, "https://spade.example.org/sp");
        assert_eq!(config.spade.eligible_cache_ttl_secs, 10);
        assert_eq!(config.lotus.daemon_auth_token, "daemon-token");
        assert_eq!(config.lotus.block_delay_secs, 30);
        assert!(!config.reservation.enabled);
        assert_eq!(config.logger.format, LogFormat::Pretty);
    }

    #[test]
    fn custom_file_wins_over_base_file() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "config.toml",
            &format!("environment = \"mainnet\"\n{TOKENS}\n[reservation]\ninterval_secs = 30\n"),
        );
        let custom = write(
            &dir,
            "custom.toml",
            "environment = \"mainnet\"\n[reservation]\ninterval_secs = 15\n",
        );

        let config = load_configuration(&base, Some(&custom)).unwrap();

        assert_eq!(config.reservation.interval_secs, 15);
        assert!(config.reservation.enabled);
        assert_eq!(config.spade.url, "https://api.spade.storage/sp");
        assert_eq!(config.lotus.miner_auth_token, "miner-token");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();

        let err = load_configuration(&dir.path().join("config.toml"), None).unwrap_err();

        assert!(matches!(err, ConfigError::MissingConfig(_)));
    }

    #[test]
    fn environment_must_be_set_and_known() {
        let dir = TempDir::new().unwrap();
        let unset = write(&dir, "unset.toml", TOKENS);
        let unknown = write(&dir, "unknown.toml", "environment = \"calibnet\"\n");

        assert!(matches!(
            load_configuration(&unset, None),
            Err(ConfigError::MissingEnvironment(_))
        ));
        assert!(matches!(
            load_configuration(&unknown, None),
            Err(ConfigError::UnknownEnvironment(env)) if env == "calibnet"
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "config.toml",
            &format!("environment = \"development\"\n{TOKENS}\n[spade]\nretries = 3\n"),
        );

        assert!(matches!(
            load_configuration(&base, None),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn invalid_spade_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "config.toml",
            &format!("environment = \"development\"\n{TOKENS}\n[spade]\nurl = \"ftp://spade\"\n"),
        );

        assert!(matches!(
            load_configuration(&base, None),
            Err(ConfigError::InvalidConfig(_))
        ));
    }
}
