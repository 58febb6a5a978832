// Copyright 2026 The sente authors
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

//! When to stop searching. Strategies are polled between playouts; on
//! top of the raw budget the driver terminates early when the second most
//! visited child can no longer catch up, and extends when the most
//! visited child does not have the best win rate (the `EARLY-C` and
//! `UNST-N` schemes of Baier and Winands, "Time Management for
//! Monte-Carlo Tree Search in Go").

mod byo_yomi;
mod rollout_limit;

pub use self::byo_yomi::*;
pub use self::rollout_limit::*;

use crate::tree::Node;

pub enum TimeStrategyResult {
    /// The budget has not run out; roughly this many playouts remain.
    NotExpired(usize),
    Expired,
    Extended
}

pub trait TimeStrategy {
    /// Checks whether this time period has expired, and if it has,
    /// whether the strategy chooses to extend it.
    fn try_extend(&self, root: &Node) -> TimeStrategyResult;
}

/// Returns the minimum number of playouts necessary for the second most
/// visited child to overtake the most visited child.
fn min_promote_rollouts(root: &Node) -> usize {
    let children = match root.children() {
        Some(children) if children.len() >= 2 => children,
        _ => return 0
    };

    let mut top_1 = 0;
    let mut top_2 = 1;

    for (i, child) in children.iter().enumerate() {
        if child.visits() > children[top_1].visits() {
            top_2 = top_1;
            top_1 = i;
        } else if i != top_1 && child.visits() > children[top_2].visits() {
            top_2 = i;
        }
    }

    if top_1 == top_2 {
        return 0;
    }

    let count_1 = children[top_1].visits();
    let count_2 = children[top_2].visits();

    if count_1 > count_2 {
        (count_1 - count_2) as usize
    } else {
        0
    }
}

/// Whichever of two budgets runs out first. The search budget is the
/// minimum of the playout limit and the wall clock.
pub struct Earliest<A, B>(pub A, pub B);

impl<A: TimeStrategy, B: TimeStrategy> TimeStrategy for Earliest<A, B> {
    fn try_extend(&self, root: &Node) -> TimeStrategyResult {
        use self::TimeStrategyResult::*;

        match (self.0.try_extend(root), self.1.try_extend(root)) {
            (Expired, _) | (_, Expired) => Expired,
            (NotExpired(a), NotExpired(b)) => NotExpired(a.min(b)),
            (NotExpired(a), Extended) | (Extended, NotExpired(a)) => NotExpired(a),
            (Extended, Extended) => Extended
        }
    }
}

/// Returns true if the search should stop.
pub fn is_done(root: &Node, strategy: &(dyn TimeStrategy + Sync)) -> bool {
    if root.visits() == 0 {
        return false;
    }

    match strategy.try_extend(root) {
        TimeStrategyResult::NotExpired(remaining) => min_promote_rollouts(root) > remaining,
        TimeStrategyResult::Extended => false,
        TimeStrategyResult::Expired => true
    }
}
