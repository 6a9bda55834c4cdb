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

use thiserror::Error;

/// Errors raised while computing voting power.
///
/// Every variant is fatal to the invocation that produced it. Nothing is
/// retried and no partial scores are returned.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// The batched multiplier read reverted or the provider was unreachable
    #[error("multiplier read failed: {0}")]
    Multicall(#[from] alloy::providers::MulticallError),

    /// A multiplier returned by the contract is not representable as a float
    #[error("invalid multiplier for {pool} pool: {value}")]
    InvalidMultiplier {
        /// Pool the multiplier was read for
        pool: crate::PoolKind,
        /// Raw value returned by the contract
        value: String,
    },

    /// Transport or HTTP status failure talking to the subgraph
    #[error("subgraph request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The subgraph answered with GraphQL errors or without data
    #[error("subgraph query failed: {0}")]
    Subgraph(String),

    /// A raw lock amount could not be converted to a decimal amount
    #[error("invalid lock amount {amount:?}: {reason}")]
    InvalidAmount {
        /// Amount as delivered by the subgraph
        amount: String,
        /// Why the conversion failed
        reason: String,
    },

    /// Strategy options are malformed
    #[error("configuration error: {0}")]
    Config(String),
}
