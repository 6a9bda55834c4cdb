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

use std::{fmt, str::FromStr, time::Duration};

use alloy::{eips::BlockId, primitives::Address};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::StrategyError;

/// Default timeout applied to each subgraph request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Block at which every read of an invocation is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Snapshot {
    /// The chain head
    #[default]
    Latest,
    /// A specific block height
    Block(u64),
}

impl Snapshot {
    /// Block height to filter on, `None` for the chain head.
    pub fn block_number(&self) -> Option<u64> {
        match self {
            Self::Latest => None,
            Self::Block(number) => Some(*number),
        }
    }

    /// Block selector for contract calls.
    pub fn block_id(&self) -> BlockId {
        match self {
            Self::Latest => BlockId::latest(),
            Self::Block(number) => BlockId::number(*number),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Block(number) => write!(f, "{number}"),
        }
    }
}

impl FromStr for Snapshot {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        s.parse::<u64>()
            .map(Self::Block)
            .map_err(|_| StrategyError::Config(format!("invalid snapshot {s:?}")))
    }
}

impl From<u64> for Snapshot {
    fn from(number: u64) -> Self {
        Self::Block(number)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Latest => serializer.serialize_str("latest"),
            Self::Block(number) => serializer.serialize_u64(*number),
        }
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl de::Visitor<'_> for SnapshotVisitor {
            type Value = Snapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"latest\" or a non-negative block number")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Snapshot, E> {
                Ok(Snapshot::Block(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Snapshot, E> {
                u64::try_from(v)
                    .map(Snapshot::Block)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Snapshot, E> {
                v.parse().map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(SnapshotVisitor)
    }
}

/// Options the host passes to the strategy, in the host's camelCase layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOptions {
    /// Contract exposing `getVotingPowerMultiplier(uint8)`
    pub voting_power_contract_address: Address,
    /// Subgraph indexing the lock entities
    pub subgraph_endpoint: Url,
    /// Decimals of the locked token
    pub decimals: u8,
    /// Multicall3 deployment, when it is not at the canonical address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicall_address: Option<Address>,
    /// Per-request timeout for subgraph queries
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl StrategyOptions {
    /// Parse options from the host's JSON representation.
    pub fn from_json(json: &str) -> Result<Self, StrategyError> {
        serde_json::from_str(json).map_err(|e| StrategyError::Config(e.to_string()))
    }

    /// Parse options from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, StrategyError> {
        serde_json::from_value(value).map_err(|e| StrategyError::Config(e.to_string()))
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
