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

//! Live pool multipliers read from the voting power contract.

use std::fmt;

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

use crate::{Snapshot, StrategyError};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IVotingPowerMultiplier {
        function getVotingPowerMultiplier(uint8 pool) external view returns (uint256);
    }
}

/// Staking pools recognised by the multiplier contract.
///
/// The discriminant is the `uint8` argument of `getVotingPowerMultiplier`
/// and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PoolKind {
    /// Room owners pool, backing `lockEntities`
    Room = 0,
    /// Lazy pool, backing `lazyPoolUserLockInfoEntities`
    Lazy = 1,
}

impl PoolKind {
    /// Argument passed to the contract for this pool.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room => f.write_str("room"),
            Self::Lazy => f.write_str("lazy"),
        }
    }
}

/// Multipliers applied to each pool's locked amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolMultipliers {
    /// Applied to direct pool locks
    pub room: f64,
    /// Applied to lazy pool locks
    pub lazy: f64,
}

impl PoolMultipliers {
    /// Multiplier for the given pool.
    pub fn get(&self, pool: PoolKind) -> f64 {
        match pool {
            PoolKind::Room => self.room,
            PoolKind::Lazy => self.lazy,
        }
    }
}

/// Source of pool multipliers at a snapshot.
#[async_trait::async_trait]
pub trait MultiplierSource: Send + Sync {
    /// Read both multipliers at the given snapshot.
    async fn multipliers(&self, snapshot: Snapshot) -> Result<PoolMultipliers, StrategyError>;
}

/// Reads multipliers from the voting power contract, both pools in one multicall.
pub struct ContractMultiplierReader<P> {
    provider: P,
    contract: Address,
    multicall: Option<Address>,
}

impl<P> ContractMultiplierReader<P> {
    /// Create a reader for the contract at `contract`.
    pub fn new(provider: P, contract: Address) -> Self {
        Self { provider, contract, multicall: None }
    }

    /// Use a Multicall3 deployment other than the canonical one.
    pub fn with_multicall_address(mut self, multicall: Option<Address>) -> Self {
        self.multicall = multicall;
        self
    }
}

impl<P: Provider> ContractMultiplierReader<P> {
    async fn read(&self, snapshot: Snapshot) -> Result<PoolMultipliers, StrategyError> {
        let contract = IVotingPowerMultiplier::new(self.contract, &self.provider);

        let mut multicall = self
            .provider
            .multicall()
            .add(contract.getVotingPowerMultiplier(PoolKind::Room.as_u8()))
            .add(contract.getVotingPowerMultiplier(PoolKind::Lazy.as_u8()))
            .block(snapshot.block_id());
        if let Some(address) = self.multicall {
            multicall = multicall.address(address);
        }

        let (room, lazy): (U256, U256) = multicall.aggregate().await?;

        Ok(PoolMultipliers {
            room: multiplier_to_f64(PoolKind::Room, room)?,
            lazy: multiplier_to_f64(PoolKind::Lazy, lazy)?,
        })
    }
}

#[async_trait::async_trait]
impl<P: Provider> MultiplierSource for ContractMultiplierReader<P> {
    async fn multipliers(&self, snapshot: Snapshot) -> Result<PoolMultipliers, StrategyError> {
        let multipliers = self.read(snapshot).await?;
        tracing::debug!(
            contract = %self.contract,
            %snapshot,
            room = multipliers.room,
            lazy = multipliers.lazy,
            "Read pool multipliers"
        );
        Ok(multipliers)
    }
}

fn multiplier_to_f64(pool: PoolKind, value: U256) -> Result<f64, StrategyError> {
    let value = value.to_string();
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(StrategyError::InvalidMultiplier { pool, value })
}
