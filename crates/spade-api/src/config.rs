use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the deal engine client.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SpadeApiConfig {
    /// Base URL including the `/sp` prefix, e.g. `https://api.spade.storage/sp`
    pub url: String,

    /// Accept invalid TLS certificates (test deployments only)
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// How long an eligible piece listing is reused before refetching
    pub eligible_cache_ttl_secs: u64,
}

impl SpadeApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn eligible_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.eligible_cache_ttl_secs)
    }

    /// Absolute URL of an endpoint path such as `/eligible_pieces`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = SpadeApiConfig {
            url: "https://api.spade.storage/sp/".to_string(),
            insecure_skip_verify: false,
            request_timeout_ms: 30_000,
            eligible_cache_ttl_secs: 10,
        };

        assert_eq!(
            config.endpoint("/eligible_pieces"),
            "https://api.spade.storage/sp/eligible_pieces"
        );
        assert_eq!(config.eligible_cache_ttl(), Duration::from_secs(10));
    }
}
