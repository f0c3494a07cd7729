use thiserror::Error;

/// Errors raised while talking to the Lotus daemon or miner.
#[derive(Error, Debug)]
pub enum ChainError {
    /// Building the JSON-RPC client failed
    #[error("Failed to build RPC client for {endpoint}: {source}")]
    ClientBuild {
        endpoint: String,
        #[source]
        source: jsonrpsee::core::ClientError,
    },

    /// The bearer token could not be turned into a header value
    #[error("Invalid authorization header for {endpoint}")]
    InvalidAuthHeader { endpoint: String },

    /// The RPC call failed in transport or returned an error object
    #[error("RPC call {method} failed: {source}")]
    Rpc {
        method: &'static str,
        #[source]
        source: jsonrpsee::core::ClientError,
    },

    /// The call succeeded but the payload is unusable
    #[error("Malformed response from {method}: {reason}")]
    MalformedResponse { method: &'static str, reason: String },

    /// The daemon is too far behind the expected chain head
    #[error(
        "Chain node is not in sync: node reported {reported_behind} epochs behind, actual behind {actual_behind} (max {max_behind})"
    )]
    OutOfSync {
        reported_behind: u64,
        actual_behind: u64,
        max_behind: u64,
    },
}
