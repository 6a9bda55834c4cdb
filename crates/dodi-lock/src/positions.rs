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

//! Aggregation of lock positions into per-address voting power.

use std::{collections::HashMap, str::FromStr};

use alloy::primitives::{utils::format_units, U256};
use futures::future::try_join_all;

use crate::{
    LockIndex, LockPositions, PoolKind, PoolMultipliers, Snapshot, StrategyError, LIMIT,
};

/// Voting power accumulated per lowercase address.
///
/// Absent addresses hold zero; contributions are only ever added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceAccumulator {
    balances: HashMap<String, f64>,
}

impl BalanceAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the balance of `address`.
    pub fn add(&mut self, address: &str, value: f64) {
        *self.balances.entry(address.to_lowercase()).or_insert(0.0) += value;
    }

    /// Balance of `address`, zero when nothing was accumulated for it.
    pub fn get_or_zero(&self, address: &str) -> f64 {
        self.balances.get(&address.to_lowercase()).copied().unwrap_or(0.0)
    }

    /// Merge another accumulator in; keys present in `other` replace ours.
    pub fn merge(&mut self, other: BalanceAccumulator) {
        self.balances.extend(other.balances);
    }

    /// Number of addresses with an accumulated balance
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether no balance was accumulated
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Convert a raw base-unit amount to a decimal token amount.
pub fn to_decimal(amount: &str, decimals: u8) -> Result<f64, StrategyError> {
    let invalid =
        |reason: String| StrategyError::InvalidAmount { amount: amount.to_string(), reason };

    let raw = U256::from_str(amount).map_err(|e| invalid(e.to_string()))?;
    let formatted = format_units(raw, decimals).map_err(|e| invalid(e.to_string()))?;
    formatted.parse::<f64>().map_err(|e| invalid(e.to_string()))
}

/// Weight every lock of `positions` into a fresh accumulator.
pub fn accumulate(
    positions: &LockPositions,
    decimals: u8,
    multipliers: PoolMultipliers,
) -> Result<BalanceAccumulator, StrategyError> {
    let mut balances = BalanceAccumulator::new();

    let room = multipliers.get(PoolKind::Room);
    for lock in &positions.lock_entities {
        balances.add(&lock.beneficiary, to_decimal(&lock.amount, decimals)? * room);
    }

    let lazy = multipliers.get(PoolKind::Lazy);
    for lock in &positions.lazy_pool_user_lock_info_entities {
        balances.add(&lock.user, to_decimal(&lock.amount, decimals)? * lazy);
    }

    Ok(balances)
}

/// Query and weight the locks of one batch of at most [LIMIT] addresses.
pub async fn aggregate_batch<L: LockIndex + ?Sized>(
    index: &L,
    addresses: &[String],
    snapshot: Snapshot,
    decimals: u8,
    multipliers: PoolMultipliers,
) -> Result<BalanceAccumulator, StrategyError> {
    let lowercase = addresses.iter().map(|a| a.to_lowercase()).collect::<Vec<_>>();
    let positions = index.unclaimed_locks(&lowercase, snapshot).await?;
    accumulate(&positions, decimals, multipliers)
}

/// Aggregate voting power for all `addresses`, one concurrent query per batch.
///
/// The first failing batch aborts the aggregation.
pub async fn aggregate_positions<L: LockIndex + ?Sized>(
    index: &L,
    addresses: &[String],
    snapshot: Snapshot,
    decimals: u8,
    multipliers: PoolMultipliers,
) -> Result<BalanceAccumulator, StrategyError> {
    let batches = addresses.chunks(LIMIT).collect::<Vec<_>>();
    tracing::debug!(
        addresses = addresses.len(),
        batches = batches.len(),
        %snapshot,
        "Querying lock positions"
    );

    let results = try_join_all(
        batches
            .into_iter()
            .map(|batch| aggregate_batch(index, batch, snapshot, decimals, multipliers)),
    )
    .await?;

    let mut balances = BalanceAccumulator::new();
    for batch in results {
        balances.merge(batch);
    }
    Ok(balances)
}
