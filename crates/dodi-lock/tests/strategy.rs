// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use alloy::{
    primitives::{address, Address, Bytes, U256},
    providers::ProviderBuilder,
    sol_types::SolValue,
};
use dodi_lock::{strategy, Snapshot, StrategyError, StrategyOptions};
use httpmock::prelude::*;
use serde_json::json;

const CONTRACT: Address = address!("0x8a5b3c5b9e8d9e2f3a1b2c3d4e5f60718293a4b5");
const AAA: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
const BBB: &str = "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB";

/// Return data of `Multicall3.aggregate` carrying one `uint256` per call.
fn aggregate_result(block: u64, multipliers: &[u64]) -> String {
    let return_data: Vec<Bytes> =
        multipliers.iter().map(|m| Bytes::from(U256::from(*m).abi_encode())).collect();
    format!("0x{}", hex::encode((U256::from(block), return_data).abi_encode_params()))
}

fn options(subgraph: &MockServer) -> StrategyOptions {
    StrategyOptions::from_value(json!({
        "votingPowerContractAddress": CONTRACT.to_string(),
        "subgraphEndpoint": subgraph.url("/subgraphs/name/dodi"),
        "decimals": 6
    }))
    .unwrap()
}

fn mock_multipliers(rpc: &MockServer, block_tag: &str, block: u64, multipliers: &[u64]) {
    let block_tag = block_tag.to_string();
    let result = aggregate_result(block, multipliers);
    rpc.mock(move |when, then| {
        when.method(POST).path("/").body_contains("eth_call").body_contains(block_tag);
        then.status(200).header("content-type", "application/json").json_body(json!({
            "jsonrpc": "2.0",
            "id": 0,
            "result": result
        }));
    });
}

#[tokio::test]
async fn scores_at_block_height() {
    let rpc = MockServer::start();
    let subgraph = MockServer::start();

    // 12345678 == 0xbc614e
    mock_multipliers(&rpc, "0xbc614e", 12345678, &[3, 2]);

    let locks = subgraph.mock(|when, then| {
        when.method(POST)
            .path("/subgraphs/name/dodi")
            .body_contains("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
            .body_contains("block: { number: 12345678 }");
        then.status(200).json_body(json!({
            "data": {
                "lockEntities": [
                    { "beneficiary": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "amount": "2000000" },
                    { "beneficiary": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "amount": "1000000" }
                ],
                "lazyPoolUserLockInfoEntities": [
                    { "user": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "amount": "500000" }
                ]
            }
        }));
    });

    let provider = ProviderBuilder::new().connect_http(rpc.base_url().parse().unwrap());
    let addresses = vec![AAA.to_string(), BBB.to_string()];

    let scores = strategy(
        "doubledice.eth",
        1,
        provider,
        &addresses,
        &options(&subgraph),
        Snapshot::Block(12345678),
    )
    .await
    .unwrap();

    locks.assert_hits(1);
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[AAA], 3.0 * 3.0 + 0.5 * 2.0);
    assert_eq!(scores[BBB], 0.0);
}

#[tokio::test]
async fn multicall_address_override_is_used() {
    let rpc = MockServer::start();
    let subgraph = MockServer::start();

    let multicall = rpc.mock(|when, then| {
        when.method(POST)
            .path("/")
            .body_contains("eth_call")
            .body_contains("0x1111111111111111111111111111111111111111");
        then.status(200).header("content-type", "application/json").json_body(json!({
            "jsonrpc": "2.0",
            "id": 0,
            "result": aggregate_result(1, &[2, 1])
        }));
    });
    subgraph.mock(|when, then| {
        when.method(POST).path("/subgraphs/name/dodi");
        then.status(200).json_body(json!({
            "data": {
                "lockEntities": [
                    { "beneficiary": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "amount": "2000000" }
                ],
                "lazyPoolUserLockInfoEntities": []
            }
        }));
    });

    let options = StrategyOptions::from_value(json!({
        "votingPowerContractAddress": CONTRACT.to_string(),
        "subgraphEndpoint": subgraph.url("/subgraphs/name/dodi"),
        "decimals": 6,
        "multicallAddress": "0x1111111111111111111111111111111111111111"
    }))
    .unwrap();
    let provider = ProviderBuilder::new().connect_http(rpc.base_url().parse().unwrap());

    let scores =
        strategy("doubledice.eth", 1, provider, &[AAA.to_string()], &options, Snapshot::Latest)
            .await
            .unwrap();

    multicall.assert_hits(1);
    assert_eq!(scores[AAA], 4.0);
}

#[tokio::test]
async fn large_address_sets_are_split_into_batches() {
    let rpc = MockServer::start();
    let subgraph = MockServer::start();

    mock_multipliers(&rpc, "latest", 1, &[1, 1]);

    let locks = subgraph.mock(|when, then| {
        when.method(POST).path("/subgraphs/name/dodi");
        then.status(200).json_body(json!({
            "data": { "lockEntities": [], "lazyPoolUserLockInfoEntities": [] }
        }));
    });

    let provider = ProviderBuilder::new().connect_http(rpc.base_url().parse().unwrap());
    let addresses = (0..2500u64).map(|i| format!("0x{i:040x}")).collect::<Vec<_>>();

    let scores =
        strategy("doubledice.eth", 1, provider, &addresses, &options(&subgraph), Snapshot::Latest)
            .await
            .unwrap();

    locks.assert_hits(3);
    assert_eq!(scores.len(), 2500);
    assert!(scores.values().all(|score| *score == 0.0));
}

#[tokio::test]
async fn subgraph_failure_aborts_invocation() {
    let rpc = MockServer::start();
    let subgraph = MockServer::start();

    mock_multipliers(&rpc, "latest", 1, &[1, 1]);
    subgraph.mock(|when, then| {
        when.method(POST).path("/subgraphs/name/dodi");
        then.status(500);
    });

    let provider = ProviderBuilder::new().connect_http(rpc.base_url().parse().unwrap());

    let result = strategy(
        "doubledice.eth",
        1,
        provider,
        &[AAA.to_string()],
        &options(&subgraph),
        Snapshot::Latest,
    )
    .await;

    assert!(matches!(result, Err(StrategyError::Http(_))));
}

#[tokio::test]
async fn multiplier_failure_aborts_before_querying_locks() {
    let rpc = MockServer::start();
    let subgraph = MockServer::start();

    rpc.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).header("content-type", "application/json").json_body(json!({
            "jsonrpc": "2.0",
            "id": 0,
            "error": { "code": -32000, "message": "execution reverted" }
        }));
    });
    let locks = subgraph.mock(|when, then| {
        when.method(POST).path("/subgraphs/name/dodi");
        then.status(200).json_body(json!({
            "data": { "lockEntities": [], "lazyPoolUserLockInfoEntities": [] }
        }));
    });

    let provider = ProviderBuilder::new().connect_http(rpc.base_url().parse().unwrap());

    let result = strategy(
        "doubledice.eth",
        1,
        provider,
        &[AAA.to_string()],
        &options(&subgraph),
        Snapshot::Latest,
    )
    .await;

    assert!(matches!(result, Err(StrategyError::Multicall(_))));
    locks.assert_hits(0);
}
