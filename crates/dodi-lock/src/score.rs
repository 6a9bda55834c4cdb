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

use std::collections::HashMap;

use crate::BalanceAccumulator;

/// Scores of `addresses`, in input order, zero for addresses without locks.
pub fn ordered_scores(balances: &BalanceAccumulator, addresses: &[String]) -> Vec<f64> {
    addresses.iter().map(|address| balances.get_or_zero(address)).collect()
}

/// Map each input address, with its original casing, to its score.
///
/// A repeated address keeps the score of its last occurrence.
pub fn combine_scores(balances: &BalanceAccumulator, addresses: &[String]) -> HashMap<String, f64> {
    addresses.iter().cloned().zip(ordered_scores(balances, addresses)).collect()
}
