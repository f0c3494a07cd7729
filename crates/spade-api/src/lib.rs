//! Authenticated client for the Spade deal engine.
//!
//! Requests carry a `FIL-SPID-V0` credential proving control of the storage
//! provider's worker key (see [`AuthCredential`]). On top of the HTTP
//! gateway sits the [`ReservationOrchestrator`], which polls eligible pieces
//! through a short-lived [`EligibilityCache`] and uses a
//! [`ReservationTracker`] so a piece is not reserved twice by this process.

mod auth;
mod cache;
mod config;
pub mod error;
mod error_code;
mod gateway;
mod orchestrator;
mod tracker;
pub mod types;

pub use auth::{AUTH_SCHEME, AuthCredential, AuthTokenBuilder, signing_message};
pub use cache::{DEFAULT_FRESHNESS, EligibilityCache, EligibilityListing};
pub use config::SpadeApiConfig;
pub use error::{ReservationError, SpadeApiError, SpadeApiErrorKind};
pub use error_code::{ApiErrorCode, ErrorCategory};
pub use gateway::{SpadeApi, SpadeHttpGateway};
pub use orchestrator::ReservationOrchestrator;
pub use tracker::ReservationTracker;
pub use types::trim_cid;
