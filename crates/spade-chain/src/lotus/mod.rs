mod types;

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonrpsee::{
    core::{client::ClientT, params::ArrayParams},
    http_client::{HeaderMap, HeaderValue, HttpClient, HttpClientBuilder},
    rpc_params,
};
use serde::de::DeserializeOwned;
use spade_observability as observability;

use self::types::{BeaconEntry, MinerInfo, NodeStatus, Signature, TipSet};
use crate::{
    ChainEpoch, ChainError, ChainFacade, LotusConfig, SyncReport, SyncStatus, check_sync,
    expected_epoch, serde_base64,
};

#[derive(Debug, Clone, Copy)]
enum RpcNode {
    Daemon,
    Miner,
}

impl RpcNode {
    fn as_str(self) -> &'static str {
        match self {
            RpcNode::Daemon => "daemon",
            RpcNode::Miner => "miner",
        }
    }
}

/// [`ChainFacade`] backed by a Lotus daemon (chain state, beacon, wallet) and
/// a Lotus miner (actor address).
pub struct LotusChain {
    daemon: HttpClient,
    provider_address: String,
    worker_address: String,
}

impl LotusChain {
    /// Connect to both APIs, verify the daemon is in sync and resolve the
    /// provider and worker addresses.
    ///
    /// Any error here is a startup failure: the client cannot authenticate
    /// without a synced chain and a known worker key.
    pub async fn connect(config: &LotusConfig) -> Result<Self, ChainError> {
        let daemon = build_client(
            &config.daemon_url,
            &config.daemon_auth_token,
            config.request_timeout,
        )?;
        let miner = build_client(
            &config.miner_url,
            &config.miner_auth_token,
            config.request_timeout,
        )?;

        let report = Self::check_daemon_sync(&daemon, config).await?;
        tracing::info!(
            epoch = report.epoch,
            expected_epoch = report.expected_epoch,
            reported_behind = report.reported_behind,
            actual_behind = report.actual_behind,
            "Connected to Lotus daemon, chain in sync"
        );

        let provider_address: String = call(
            &miner,
            RpcNode::Miner,
            "Filecoin.ActorAddress",
            rpc_params![],
        )
        .await?;

        let finalized = Self::finalized_tipset(&daemon, config, report.epoch).await?;
        let miner_info: MinerInfo = call(
            &daemon,
            RpcNode::Daemon,
            "Filecoin.StateMinerInfo",
            rpc_params![&provider_address, &finalized.cids],
        )
        .await?;

        tracing::info!(
            provider = %provider_address,
            worker = %miner_info.worker,
            finalized_height = finalized.height,
            "Connected to Lotus miner"
        );

        Ok(Self {
            daemon,
            provider_address,
            worker_address: miner_info.worker,
        })
    }

    /// Worker address used for signing.
    pub fn worker_address(&self) -> &str {
        &self.worker_address
    }

    async fn check_daemon_sync(
        daemon: &HttpClient,
        config: &LotusConfig,
    ) -> Result<SyncReport, ChainError> {
        let status = node_sync_status(daemon).await?;
        let expected = expected_epoch(
            config.genesis_timestamp,
            config.block_delay_secs,
            unix_now(),
        );

        let result = check_sync(status, expected, config.max_behind_epochs);
        match &result {
            Ok(report) => {
                observability::record_chain_sync_lag(report.reported_behind, report.actual_behind)
            }
            Err(ChainError::OutOfSync {
                reported_behind,
                actual_behind,
                ..
            }) => observability::record_chain_sync_lag(*reported_behind, *actual_behind),
            Err(_) => {}
        }
        result
    }

    async fn finalized_tipset(
        daemon: &HttpClient,
        config: &LotusConfig,
        head: ChainEpoch,
    ) -> Result<TipSet, ChainError> {
        let height = (head - config.finality_epochs).max(0);
        let empty_key: Vec<serde_json::Value> = Vec::new();
        let tipset: TipSet = call(
            daemon,
            RpcNode::Daemon,
            "Filecoin.ChainGetTipSetByHeight",
            rpc_params![height, empty_key],
        )
        .await?;

        if tipset.cids.is_empty() {
            return Err(ChainError::MalformedResponse {
                method: "Filecoin.ChainGetTipSetByHeight",
                reason: format!("tipset at height {height} has no block cids"),
            });
        }
        Ok(tipset)
    }
}

#[async_trait]
impl ChainFacade for LotusChain {
    async fn current_epoch(&self) -> Result<ChainEpoch, ChainError> {
        Ok(node_sync_status(&self.daemon).await?.epoch)
    }

    async fn beacon_entry(&self, epoch: ChainEpoch) -> Result<Vec<u8>, ChainError> {
        let entry: BeaconEntry = call(
            &self.daemon,
            RpcNode::Daemon,
            "Filecoin.StateGetBeaconEntry",
            rpc_params![epoch],
        )
        .await?;
        Ok(entry.data)
    }

    async fn sign_as_worker(&self, message: &[u8]) -> Result<Vec<u8>, ChainError> {
        let signature: Signature = call(
            &self.daemon,
            RpcNode::Daemon,
            "Filecoin.WalletSign",
            rpc_params![&self.worker_address, serde_base64::encode(message)],
        )
        .await?;

        if signature.data.is_empty() {
            return Err(ChainError::MalformedResponse {
                method: "Filecoin.WalletSign",
                reason: "empty signature".to_string(),
            });
        }
        Ok(signature.data)
    }

    fn provider_address(&self) -> &str {
        &self.provider_address
    }
}

fn build_client(
    endpoint: &str,
    token: &str,
    request_timeout: Duration,
) -> Result<HttpClient, ChainError> {
    let mut headers = HeaderMap::new();
    let authorization = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        ChainError::InvalidAuthHeader {
            endpoint: endpoint.to_string(),
        }
    })?;
    headers.insert("Authorization", authorization);

    HttpClientBuilder::default()
        .set_headers(headers)
        .request_timeout(request_timeout)
        .build(endpoint)
        .map_err(|source| ChainError::ClientBuild {
            endpoint: endpoint.to_string(),
            source,
        })
}

async fn node_sync_status(daemon: &HttpClient) -> Result<SyncStatus, ChainError> {
    let status: NodeStatus = call(
        daemon,
        RpcNode::Daemon,
        "Filecoin.NodeStatus",
        rpc_params![false],
    )
    .await?;
    Ok(status.sync_status.into())
}

async fn call<R>(
    client: &HttpClient,
    node: RpcNode,
    method: &'static str,
    params: ArrayParams,
) -> Result<R, ChainError>
where
    R: DeserializeOwned,
{
    let started = Instant::now();
    let result = client.request::<R, _>(method, params).await;
    let status = if result.is_ok() { "ok" } else { "error" };
    observability::record_chain_rpc_call(node.as_str(), method, status, started.elapsed());

    result.map_err(|source| {
        tracing::debug!(node = node.as_str(), method, error = %source, "Lotus RPC call failed");
        ChainError::Rpc { method, source }
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;
