//! Subset of the Lotus JSON-RPC payloads read by the client.

use serde::Deserialize;

use crate::SyncStatus;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NodeStatus {
    pub sync_status: NodeSyncStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NodeSyncStatus {
    pub epoch: u64,
    pub behind: u64,
}

impl From<NodeSyncStatus> for SyncStatus {
    fn from(status: NodeSyncStatus) -> Self {
        SyncStatus {
            epoch: status.epoch as i64,
            behind: status.behind,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct BeaconEntry {
    #[serde(with = "crate::serde_base64")]
    pub data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Signature {
    #[serde(with = "crate::serde_base64")]
    pub data: Vec<u8>,
}

/// Only the key is needed; it is passed back verbatim to `StateMinerInfo`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct TipSet {
    pub cids: Vec<serde_json::Value>,
    pub height: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct MinerInfo {
    pub worker: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_status_decodes_sync_fields() {
        let status: NodeStatus = serde_json::from_str(
            r#"{"SyncStatus":{"Epoch":4200000,"Behind":1},"PeerStatus":{"PeersToPublishMsgs":50,"PeersToPublishBlocks":50},"ChainStatus":{"BlocksPerTipsetLast100":4.5,"BlocksPerTipsetLastFinality":4.7}}"#,
        )
        .unwrap();

        let status = SyncStatus::from(status.sync_status);
        assert_eq!(status.epoch, 4_200_000);
        assert_eq!(status.behind, 1);
    }

    #[test]
    fn beacon_entry_data_is_base64() {
        let entry: BeaconEntry =
            serde_json::from_str(r#"{"Round":123,"Data":"AQID"}"#).unwrap();
        assert_eq!(entry.data, vec![1, 2, 3]);
    }

    #[test]
    fn null_signature_data_decodes_empty() {
        let signature: Signature = serde_json::from_str(r#"{"Type":1,"Data":null}"#).unwrap();
        assert!(signature.data.is_empty());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let result = serde_json::from_str::<BeaconEntry>(r#"{"Round":1,"Data":"***"}"#);
        assert!(result.is_err());
    }
}
