use spade_chain::ChainError;
use thiserror::Error;

use crate::error_code::ApiErrorCode;

/// Errors returned by a single call to the deal engine.
#[derive(Error, Debug)]
pub enum SpadeApiError {
    /// The `FIL-SPID-V0` credential could not be built
    #[error("Failed to build auth credential: {0}")]
    Credential(#[from] ChainError),

    /// Connection, TLS or timeout failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 401; the credential was not accepted
    #[error("Unauthorized by deal engine: {body}")]
    Unauthorized { body: String },

    /// Any other non-200 status
    #[error("Unexpected status {status} from deal engine: {body}")]
    Status { status: u16, body: String },

    /// Body was not a valid response envelope
    #[error("Failed to decode deal engine response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// HTTP 200 carrying a non-empty `error_slug`. Displays as the slug.
    #[error("{slug}")]
    Rejected {
        slug: String,
        error_code: Option<i64>,
        code: Option<ApiErrorCode>,
        error_lines: Vec<String>,
    },
}

/// Classification of a [`SpadeApiError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpadeApiErrorKind {
    Credential,
    Transport,
    Unauthorized,
    Status,
    Decode,
    Rejected,
}

impl SpadeApiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SpadeApiErrorKind::Credential => "credential",
            SpadeApiErrorKind::Transport => "transport",
            SpadeApiErrorKind::Unauthorized => "unauthorized",
            SpadeApiErrorKind::Status => "status",
            SpadeApiErrorKind::Decode => "decode",
            SpadeApiErrorKind::Rejected => "rejected",
        }
    }
}

impl SpadeApiError {
    pub fn kind(&self) -> SpadeApiErrorKind {
        match self {
            SpadeApiError::Credential(_) => SpadeApiErrorKind::Credential,
            SpadeApiError::Transport(_) => SpadeApiErrorKind::Transport,
            SpadeApiError::Unauthorized { .. } => SpadeApiErrorKind::Unauthorized,
            SpadeApiError::Status { .. } => SpadeApiErrorKind::Status,
            SpadeApiError::Decode { .. } => SpadeApiErrorKind::Decode,
            SpadeApiError::Rejected { .. } => SpadeApiErrorKind::Rejected,
        }
    }

    /// Classified rejection code, for `Rejected` errors the client recognizes.
    pub fn api_error_code(&self) -> Option<ApiErrorCode> {
        match self {
            SpadeApiError::Rejected { code, .. } => *code,
            _ => None,
        }
    }

    /// Metric label for a rejection: the known slug, or `"unknown"` so remote
    /// values never become label values.
    pub(crate) fn rejection_label(&self) -> &'static str {
        self.api_error_code()
            .map(ApiErrorCode::slug)
            .unwrap_or("unknown")
    }

    /// Build a `Rejected` error, classifying by slug first and numeric code
    /// second.
    pub(crate) fn rejected(slug: &str, error_code: Option<i64>, error_lines: Vec<String>) -> Self {
        let code = ApiErrorCode::from_slug(slug)
            .or_else(|| error_code.and_then(ApiErrorCode::from_code));
        SpadeApiError::Rejected {
            slug: slug.to_string(),
            error_code,
            code,
            error_lines,
        }
    }
}

/// Errors from one reservation attempt.
#[derive(Error, Debug)]
pub enum ReservationError {
    /// Eligible piece listing could not be fetched
    #[error("Failed to list eligible pieces: {0}")]
    Listing(#[source] SpadeApiError),

    /// Every eligible piece was already attempted by this process
    #[error("No untried piece among {eligible} eligible pieces")]
    NoUntriedPiece { eligible: usize },

    /// The reservation call for a chosen piece failed
    #[error("Failed to reserve piece {piece_cid}: {source}")]
    Invoke {
        piece_cid: String,
        #[source]
        source: SpadeApiError,
    },
}

impl ReservationError {
    /// Underlying deal engine error, if the failure came from a remote call.
    pub fn api_error(&self) -> Option<&SpadeApiError> {
        match self {
            ReservationError::Listing(source) | ReservationError::Invoke { source, .. } => {
                Some(source)
            }
            ReservationError::NoUntriedPiece { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_classifies_by_slug_then_code() {
        let by_slug = SpadeApiError::rejected("ErrTooManyReplicas", None, Vec::new());
        assert_eq!(by_slug.api_error_code(), Some(ApiErrorCode::TooManyReplicas));

        let by_code = SpadeApiError::rejected("ErrRenamedUpstream", Some(4022), Vec::new());
        assert_eq!(
            by_code.api_error_code(),
            Some(ApiErrorCode::TenantsOutOfDatacap)
        );

        let unknown = SpadeApiError::rejected("ErrSomethingNew", Some(4999), Vec::new());
        assert_eq!(unknown.kind(), SpadeApiErrorKind::Rejected);
        assert_eq!(unknown.api_error_code(), None);
    }

    #[test]
    fn rejection_label_is_bounded_to_known_codes() {
        let renamed = SpadeApiError::rejected("ErrRenamedUpstream", Some(4023), Vec::new());
        assert_eq!(renamed.rejection_label(), "ErrTooManyReplicas");

        let unknown = SpadeApiError::rejected("ErrSomething-req-8b0c6a3e", None, Vec::new());
        assert_eq!(unknown.rejection_label(), "unknown");
    }

    #[test]
    fn rejection_displays_slug_verbatim() {
        let err = SpadeApiError::rejected(
            "ErrTenantsOutOfDatacap",
            Some(4022),
            vec!["tenant 7 has no datacap left".to_string()],
        );
        assert_eq!(err.to_string(), "ErrTenantsOutOfDatacap");
    }

    #[test]
    fn no_untried_piece_has_no_api_error() {
        let err = ReservationError::NoUntriedPiece { eligible: 2 };
        assert!(err.api_error().is_none());

        let err = ReservationError::Invoke {
            piece_cid: "baga6ea4seaq".to_string(),
            source: SpadeApiError::Unauthorized {
                body: "bad signature".to_string(),
            },
        };
        assert_eq!(
            err.api_error().map(SpadeApiError::kind),
            Some(SpadeApiErrorKind::Unauthorized)
        );
    }
}
