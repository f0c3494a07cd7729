#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{body_partial_json, header, method},
};

use super::*;

const HEAD_EPOCH: i64 = 1_000;

fn rpc_result(result: Value) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    move |request: &Request| {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": body["id"].clone(),
            "result": result.clone(),
        }))
    }
}

fn test_config(daemon: &MockServer, miner: &MockServer) -> LotusConfig {
    LotusConfig {
        daemon_url: daemon.uri(),
        daemon_auth_token: "daemon-token".to_string(),
        miner_url: miner.uri(),
        miner_auth_token: "miner-token".to_string(),
        request_timeout: Duration::from_secs(5),
        max_behind_epochs: 5,
        // Puts the wall-clock expected epoch at HEAD_EPOCH.
        genesis_timestamp: unix_now() - HEAD_EPOCH * 30,
        block_delay_secs: 30,
        finality_epochs: 900,
    }
}

async fn mount(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(rpc_result(result))
        .mount(server)
        .await;
}

async fn mount_node_status(daemon: &MockServer, epoch: i64, behind: u64) {
    mount(
        daemon,
        "Filecoin.NodeStatus",
        json!({ "SyncStatus": { "Epoch": epoch, "Behind": behind } }),
    )
    .await;
}

async fn mount_identity(daemon: &MockServer, miner: &MockServer) {
    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer miner-token"))
        .and(body_partial_json(json!({ "method": "Filecoin.ActorAddress" })))
        .respond_with(rpc_result(json!("f01234")))
        .mount(miner)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "Filecoin.ChainGetTipSetByHeight",
            "params": [HEAD_EPOCH - 900, []],
        })))
        .respond_with(rpc_result(json!({
            "Cids": [{ "/": "bafy2bzacea" }],
            "Blocks": [],
            "Height": HEAD_EPOCH - 900,
        })))
        .mount(daemon)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "Filecoin.StateMinerInfo",
            "params": ["f01234", [{ "/": "bafy2bzacea" }]],
        })))
        .respond_with(rpc_result(json!({
            "Owner": "f0100",
            "Worker": "f0555",
            "SectorSize": 34359738368u64,
        })))
        .mount(daemon)
        .await;
}

async fn connected_chain() -> (LotusChain, MockServer, MockServer) {
    let daemon = MockServer::start().await;
    let miner = MockServer::start().await;
    mount_node_status(&daemon, HEAD_EPOCH, 0).await;
    mount_identity(&daemon, &miner).await;

    let chain = LotusChain::connect(&test_config(&daemon, &miner))
        .await
        .unwrap();
    (chain, daemon, miner)
}

#[tokio::test]
async fn connect_resolves_provider_and_worker_addresses() {
    let (chain, _daemon, _miner) = connected_chain().await;

    assert_eq!(chain.provider_address(), "f01234");
    assert_eq!(chain.worker_address(), "f0555");
    assert_eq!(chain.current_epoch().await.unwrap(), HEAD_EPOCH);
}

#[tokio::test]
async fn connect_sends_daemon_bearer_token() {
    let daemon = MockServer::start().await;
    let miner = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer daemon-token"))
        .and(body_partial_json(json!({ "method": "Filecoin.NodeStatus" })))
        .respond_with(rpc_result(json!({
            "SyncStatus": { "Epoch": HEAD_EPOCH, "Behind": 0 }
        })))
        .expect(1)
        .mount(&daemon)
        .await;
    mount_identity(&daemon, &miner).await;

    LotusChain::connect(&test_config(&daemon, &miner))
        .await
        .unwrap();
}

#[tokio::test]
async fn connect_refuses_lagging_daemon() {
    let daemon = MockServer::start().await;
    let miner = MockServer::start().await;
    mount_node_status(&daemon, HEAD_EPOCH - 50, 0).await;
    mount_identity(&daemon, &miner).await;

    let result = LotusChain::connect(&test_config(&daemon, &miner)).await;

    assert!(matches!(
        result,
        Err(ChainError::OutOfSync {
            max_behind: 5,
            ..
        })
    ));
}

#[tokio::test]
async fn beacon_entry_returns_decoded_data() {
    let (chain, daemon, _miner) = connected_chain().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "Filecoin.StateGetBeaconEntry",
            "params": [HEAD_EPOCH],
        })))
        .respond_with(rpc_result(json!({ "Round": 4242, "Data": "AQID" })))
        .mount(&daemon)
        .await;

    let beacon = chain.beacon_entry(HEAD_EPOCH).await.unwrap();

    assert_eq!(beacon, vec![1, 2, 3]);
}

#[tokio::test]
async fn sign_as_worker_signs_base64_message_with_worker_key() {
    let (chain, daemon, _miner) = connected_chain().await;
    // "   \x01\x02" in standard base64
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "Filecoin.WalletSign",
            "params": ["f0555", "ICAgAQI="],
        })))
        .respond_with(rpc_result(json!({ "Type": 1, "Data": "c2lnbmVk" })))
        .expect(1)
        .mount(&daemon)
        .await;

    let signature = chain.sign_as_worker(b"   \x01\x02").await.unwrap();

    assert_eq!(signature, b"signed".to_vec());
}

#[tokio::test]
async fn rpc_error_object_surfaces_as_rpc_error() {
    let (chain, daemon, _miner) = connected_chain().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "Filecoin.WalletSign" })))
        .respond_with(|request: &Request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": body["id"].clone(),
                "error": { "code": 1, "message": "key not found" },
            }))
        })
        .mount(&daemon)
        .await;

    let err = chain.sign_as_worker(b"message").await.unwrap_err();

    assert!(matches!(
        err,
        ChainError::Rpc {
            method: "Filecoin.WalletSign",
            ..
        }
    ));
}
