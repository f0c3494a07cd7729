//! Request/response payloads of the Spade deal engine `/sp/*` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Wrapper around every deal engine response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de> + Default"
))]
pub struct ResponseEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub response_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_state_epoch: Option<i64>,
    pub response_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_slug: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub error_lines: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub info_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_entries: Option<i64>,
    /// Rejections may omit the payload or send `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: T,
}

impl<T> ResponseEnvelope<T> {
    /// Non-empty `error_slug`, marking a logical failure despite HTTP 200.
    pub fn rejection_slug(&self) -> Option<&str> {
        self.error_slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
    }

    /// `response_entries` when present, else the number of entries decoded.
    pub fn entry_count(&self, decoded: usize) -> usize {
        self.response_entries
            .map(|entries| entries.max(0) as usize)
            .unwrap_or(decoded)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload of `/sp/eligible_pieces`, in the order the engine prefers.
pub type ResponsePiecesEligible = Vec<Piece>;

/// Payload of `/sp/piece_manifest`; passed through without interpretation.
pub type PieceManifest = serde_json::Value;

// Go encodes nil slices as `null`; every list field goes through
// `null_as_default`.

/// Payload of `/sp/pending_proposals`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePendingProposals {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_failures: Vec<ProposalFailure>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pending_proposals: Vec<DealProposal>,
}

/// Payload of a `reserve_piece` invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseDealRequest {
    #[serde(
        rename = "tenant_replication_states",
        default,
        deserialize_with = "null_as_default"
    )]
    pub replication_states: Vec<TenantReplicationState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_start_epoch: Option<i64>,
}

/// A piece this provider may reserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub piece_cid: String,
    pub padded_piece_size: u64,
    #[serde(rename = "tenant_id")]
    pub claiming_tenant: i16,
    pub tenant_policy_cid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_reserve_cmd: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalFailure {
    #[serde(rename = "timestamp")]
    pub error_timestamp: DateTime<Utc>,
    pub error: String,
    pub piece_cid: String,
    #[serde(rename = "deal_proposal_id")]
    pub proposal_id: String,
    #[serde(rename = "deal_proposal_cid", default, skip_serializing_if = "Option::is_none")]
    pub proposal_cid: Option<String>,
    pub tenant_id: i16,
    #[serde(rename = "tenant_client_id")]
    pub tenant_client: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealProposal {
    #[serde(rename = "deal_proposal_id")]
    pub proposal_id: String,
    #[serde(rename = "deal_proposal_cid", default, skip_serializing_if = "Option::is_none")]
    pub proposal_cid: Option<String>,
    pub hours_remaining: i64,
    pub piece_size: i64,
    pub piece_cid: String,
    pub tenant_id: i16,
    #[serde(rename = "tenant_client_id")]
    pub tenant_client: String,
    #[serde(rename = "deal_start_time")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "deal_start_epoch")]
    pub start_epoch: i64,
    #[serde(rename = "sample_import_cmd")]
    pub import_cmd: String,
    #[serde(rename = "segmentation_type", default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<String>,
    #[serde(rename = "sample_assembly_cmd", default, skip_serializing_if = "Option::is_none")]
    pub assembly_cmd: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub data_sources: Vec<String>,
}

/// Per-tenant replication accounting returned with a reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantReplicationState {
    pub tenant_id: i16,
    #[serde(rename = "tenant_client_id", default)]
    pub tenant_client: Option<String>,

    #[serde(rename = "tenant_max_in_flight_bytes")]
    pub max_in_flight_bytes: i64,
    #[serde(rename = "actual_in_flight_bytes")]
    pub sp_in_flight_bytes: i64,

    #[serde(rename = "tenant_max_total")]
    pub max_total: i16,
    #[serde(rename = "tenant_max_per_org")]
    pub max_org: i16,
    #[serde(rename = "tenant_max_per_metro")]
    pub max_city: i16,
    #[serde(rename = "tenant_max_per_country")]
    pub max_country: i16,
    #[serde(rename = "tenant_max_per_continent")]
    pub max_continent: i16,

    #[serde(rename = "actual_total")]
    pub total: i16,
    #[serde(rename = "actual_within_org")]
    pub in_org: i16,
    #[serde(rename = "actual_within_metro")]
    pub in_city: i16,
    #[serde(rename = "actual_within_country")]
    pub in_country: i16,
    #[serde(rename = "actual_within_continent")]
    pub in_continent: i16,

    #[serde(rename = "sp_holds_qualifying_deal")]
    pub deal_already_exists: bool,
}

const CID_TRIM_PREFIX: usize = 6;
const CID_TRIM_SUFFIX: usize = 8;

/// Shorten a CID for log output: `baga6e~abcdefgh`.
pub fn trim_cid(cid: &str) -> String {
    if !cid.is_ascii() || cid.len() <= CID_TRIM_PREFIX + CID_TRIM_SUFFIX + 2 {
        return cid.to_string();
    }
    format!(
        "{}~{}",
        &cid[..CID_TRIM_PREFIX],
        &cid[cid.len() - CID_TRIM_SUFFIX..]
    )
}
