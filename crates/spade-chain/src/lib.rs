//! Chain access for the spade client.
//!
//! The deal engine authenticates a storage provider by checking a signature
//! made with the provider's worker key over the current drand beacon. This
//! crate exposes exactly the chain operations that flow needs through the
//! [`ChainFacade`] trait, plus a Lotus JSON-RPC implementation ([`LotusChain`])
//! and the startup sync check the binary runs before polling begins.

mod config;
mod config_error;
mod error;
mod facade;
mod lotus;
mod serde_base64;
mod sync;

pub use config::{LotusConfig, LotusConfigRaw};
pub use config_error::ConfigError;
pub use error::ChainError;
pub use facade::{ChainEpoch, ChainFacade};
pub use lotus::LotusChain;
pub use sync::{SyncReport, SyncStatus, check_sync, expected_epoch};
