use spade_api::SpadeApiError;
use spade_chain::ChainError;
use thiserror::Error;

use crate::config::ConfigError;

/// Failures that stop the client: at startup, or when polling dies on its
/// own before a shutdown signal.
///
/// Returned from [`crate::run`]; the binary decides how to exit.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lotus unreachable or addresses could not be resolved
    #[error("Failed to connect to Lotus: {0}")]
    ChainConnect(#[source] ChainError),

    #[error("Lotus is not usable: {0}")]
    ChainOutOfSync(#[source] ChainError),

    #[error("Failed to build deal engine client: {0}")]
    Gateway(#[source] SpadeApiError),

    /// The authenticated startup probe against the deal engine failed
    #[error("Deal engine health check failed: {0}")]
    DealEngineUnreachable(#[source] SpadeApiError),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Periodic tasks exited before shutdown was requested")]
    PeriodicTasksExited,
}

impl From<ChainError> for StartupError {
    fn from(error: ChainError) -> Self {
        match error {
            ChainError::OutOfSync { .. } => StartupError::ChainOutOfSync(error),
            other => StartupError::ChainConnect(other),
        }
    }
}
