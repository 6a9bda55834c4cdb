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

//! Client for the subgraph indexing DoubleDice pool locks.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Snapshot, StrategyError, LIMIT};

/// Unclaimed lock in the room owners pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LockRecord {
    /// Address entitled to claim the lock
    pub beneficiary: String,
    /// Locked amount in token base units, as a decimal string
    pub amount: String,
}

/// Unclaimed lock in the lazy pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LazyLockRecord {
    /// Address owning the lock
    pub user: String,
    /// Locked amount in token base units, as a decimal string
    pub amount: String,
}

/// Both lock collections returned for one batch of addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockPositions {
    /// Direct pool locks
    pub lock_entities: Vec<LockRecord>,
    /// Lazy pool locks
    pub lazy_pool_user_lock_info_entities: Vec<LazyLockRecord>,
}

/// Index of unclaimed lock positions.
#[async_trait::async_trait]
pub trait LockIndex: Send + Sync {
    /// Fetch the unclaimed locks of `addresses` (lowercase) at `snapshot`.
    async fn unclaimed_locks(
        &self,
        addresses: &[String],
        snapshot: Snapshot,
    ) -> Result<LockPositions, StrategyError>;
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<LockPositions>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// Build the query for both lock collections of `addresses`.
///
/// The block argument is only present when the snapshot names a height, the
/// subgraph then answers from the chain head.
pub fn build_lock_query(addresses: &[String], snapshot: Snapshot) -> String {
    let list = addresses
        .iter()
        .map(|a| serde_json::Value::String(a.clone()).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let block = snapshot
        .block_number()
        .map(|number| format!(", block: {{ number: {number} }}"))
        .unwrap_or_default();

    format!(
        "query {{ \
lockEntities(first: {LIMIT}, where: {{ beneficiary_in: [{list}], claimed: false }}{block}) \
{{ beneficiary amount }} \
lazyPoolUserLockInfoEntities(first: {LIMIT}, \
where: {{ user_in: [{list}], claimed: false }}{block}) \
{{ user amount }} \
}}"
    )
}

#[derive(Clone, Debug)]
/// HTTP client for a lock subgraph endpoint
pub struct SubgraphClient {
    client: Client,
    endpoint: Url,
}

impl SubgraphClient {
    /// Create a client for `endpoint` with the given request timeout
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, StrategyError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dodi-lock/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait::async_trait]
impl LockIndex for SubgraphClient {
    async fn unclaimed_locks(
        &self,
        addresses: &[String],
        snapshot: Snapshot,
    ) -> Result<LockPositions, StrategyError> {
        let query = build_lock_query(addresses, snapshot);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&GraphQlRequest { query: &query })
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let body: GraphQlResponse = serde_json::from_str(&text)
            .map_err(|e| StrategyError::Subgraph(format!("malformed response: {e}")))?;
        if !body.errors.is_empty() {
            let messages = body.errors.into_iter().map(|e| e.message).collect::<Vec<_>>();
            return Err(StrategyError::Subgraph(messages.join("; ")));
        }

        let positions = body
            .data
            .ok_or_else(|| StrategyError::Subgraph("response carried no data".to_string()))?;

        tracing::debug!(
            endpoint = %self.endpoint,
            addresses = addresses.len(),
            locks = positions.lock_entities.len(),
            lazy_locks = positions.lazy_pool_user_lock_info_entities.len(),
            "Fetched lock positions"
        );

        Ok(positions)
    }
}
