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

//! Voting power strategy over DoubleDice pool locks.
//!
//! Each address scores the sum of its unclaimed locks, converted to token
//! units and weighted by the pool multiplier the voting power contract
//! reports at the snapshot block. Direct locks (`lockEntities`) use the room
//! multiplier, lazy pool locks (`lazyPoolUserLockInfoEntities`) the lazy one.

#![deny(missing_docs)]

use std::collections::HashMap;

use alloy::providers::Provider;

/// Strategy options and snapshot selection
pub mod config;
mod error;
/// Pool multipliers read from the voting power contract
pub mod multiplier;
/// Per-address accumulation of lock positions
pub mod positions;
/// Final per-address scores
pub mod score;
/// Subgraph access for lock positions
pub mod subgraph;

pub use config::{Snapshot, StrategyOptions};
pub use error::StrategyError;
pub use multiplier::{ContractMultiplierReader, MultiplierSource, PoolKind, PoolMultipliers};
pub use positions::{aggregate_positions, BalanceAccumulator};
pub use score::combine_scores;
pub use subgraph::{LazyLockRecord, LockIndex, LockPositions, LockRecord, SubgraphClient};

/// Strategy name as registered with the host
pub const NAME: &str = "dodi-lock";
/// Strategy author
pub const AUTHOR: &str = "dev@doubledice";
/// Strategy version
pub const VERSION: &str = "0.1.0";

/// Maximum number of addresses per subgraph query, also the page size of
/// each lock collection.
pub const LIMIT: usize = 1000;

/// Voting power computation over a multiplier source and a lock index.
pub struct LockVotingPower<M, L> {
    multipliers: M,
    index: L,
    decimals: u8,
}

impl<M: MultiplierSource, L: LockIndex> LockVotingPower<M, L> {
    /// Create a strategy for a token with `decimals` decimals.
    pub fn new(multipliers: M, index: L, decimals: u8) -> Self {
        Self { multipliers, index, decimals }
    }

    /// Score every address at `snapshot`.
    ///
    /// Multipliers are read once before any lock query is issued; all lock
    /// queries then run concurrently and the first failure aborts the call.
    pub async fn scores(
        &self,
        addresses: &[String],
        snapshot: Snapshot,
    ) -> Result<HashMap<String, f64>, StrategyError> {
        let multipliers = self.multipliers.multipliers(snapshot).await?;

        let balances =
            aggregate_positions(&self.index, addresses, snapshot, self.decimals, multipliers)
                .await?;

        let scores = combine_scores(&balances, addresses);
        tracing::info!(
            addresses = addresses.len(),
            holders = balances.len(),
            room = multipliers.room,
            lazy = multipliers.lazy,
            "Computed voting power"
        );
        Ok(scores)
    }
}

/// Entry point invoked by the host.
///
/// `space` and `network` identify the invocation and only appear in logs.
/// Returns one score per input address keyed by the address as given.
#[tracing::instrument(skip_all, fields(space = %space, network = network, snapshot = %snapshot))]
pub async fn strategy<P>(
    space: &str,
    network: u64,
    provider: P,
    addresses: &[String],
    options: &StrategyOptions,
    snapshot: Snapshot,
) -> Result<HashMap<String, f64>, StrategyError>
where
    P: Provider,
{
    let multipliers =
        ContractMultiplierReader::new(provider, options.voting_power_contract_address)
            .with_multicall_address(options.multicall_address);
    let index =
        SubgraphClient::new(options.subgraph_endpoint.clone(), options.request_timeout())?;

    LockVotingPower::new(multipliers, index, options.decimals).scores(addresses, snapshot).await
}
