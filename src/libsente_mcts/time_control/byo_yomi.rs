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

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::tree::Node;

use super::{TimeStrategy, TimeStrategyResult};

/// A wall-clock budget as computed by the game's time controller, with a
/// single `UNST-N` extension: when the allocation runs out while the most
/// visited child does not also have the best win rate, the search gets
/// half the allocation again to settle the disagreement.
#[derive(Clone)]
pub struct ByoYomi {
    started: Instant,
    allocation: Duration,
    extended: Arc<AtomicBool>
}

impl ByoYomi {
    pub fn new(allocation: Duration) -> ByoYomi {
        ByoYomi {
            started: Instant::now(),
            allocation,
            extended: Arc::new(AtomicBool::new(false))
        }
    }

    /// True if the most visited child and the best-winrate child
    /// disagree, which is the unstable condition worth extending for.
    fn is_unstable(root: &Node) -> bool {
        let children = match root.children() {
            Some(children) if children.len() >= 2 => children,
            _ => return false
        };

        let color = root.to_move();
        let by_visits = children.iter().enumerate()
            .max_by_key(|(_, c)| c.visits())
            .map(|(i, _)| i);
        let by_winrate = children.iter().enumerate()
            .filter(|(_, c)| c.visits() > 0)
            .max_by(|(_, a), (_, b)| {
                a.winrate_for(color).partial_cmp(&b.winrate_for(color)).expect("winrate is NaN")
            })
            .map(|(i, _)| i);

        match (by_visits, by_winrate) {
            (Some(a), Some(b)) => a != b,
            _ => false
        }
    }
}

impl TimeStrategy for ByoYomi {
    fn try_extend(&self, root: &Node) -> TimeStrategyResult {
        let elapsed = self.started.elapsed();
        let budget = if self.extended.load(Ordering::Acquire) {
            self.allocation + self.allocation / 2
        } else {
            self.allocation
        };

        if elapsed < budget {
            // translate the remaining wall clock into a playout estimate
            // from the rate observed so far
            let visits = root.visits().max(1) as f64;
            let rate = visits / elapsed.as_secs_f64().max(1e-3);
            let remaining = (budget - elapsed).as_secs_f64() * rate;

            return TimeStrategyResult::NotExpired(remaining as usize);
        }

        if !self.extended.swap(true, Ordering::AcqRel) && ByoYomi::is_unstable(root) {
            return TimeStrategyResult::Extended;
        }

        TimeStrategyResult::Expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sente_go::{Color, Vertex};

    fn noisy_root() -> Node {
        let root = Node::new(Color::Black, Vertex::Pass, 1.0);

        assert!(root.try_mark_expanding());
        root.expand(vec![(0.5, Vertex::Point(22)), (0.5, Vertex::Point(23))], 0.5);
        root
    }

    #[test]
    fn open_budget_is_not_expired() {
        let root = noisy_root();
        root.update(0.5);

        let strategy = ByoYomi::new(Duration::from_secs(60));

        match strategy.try_extend(&root) {
            TimeStrategyResult::NotExpired(_) => {},
            _ => panic!("expected an open budget")
        }
    }

    #[test]
    fn stable_root_expires() {
        let root = noisy_root();
        let children = root.children().expect("not expanded");

        // the most visited child also has the best winrate
        for _ in 0..3 {
            children[0].update(0.9);
            root.update(0.9);
        }
        children[1].update(0.1);
        root.update(0.1);

        let strategy = ByoYomi::new(Duration::from_millis(0));

        match strategy.try_extend(&root) {
            TimeStrategyResult::Expired => {},
            _ => panic!("expected the budget to expire")
        }
    }

    #[test]
    fn unstable_root_extends_once() {
        let root = noisy_root();
        let children = root.children().expect("not expanded");

        // most visits on child 0, best winrate on child 1
        for _ in 0..3 {
            children[0].update(0.2);
            root.update(0.2);
        }
        children[1].update(0.9);
        root.update(0.9);

        let strategy = ByoYomi::new(Duration::from_millis(0));

        match strategy.try_extend(&root) {
            TimeStrategyResult::Extended => {},
            _ => panic!("expected an extension")
        }

        // a second expiry is final
        match strategy.try_extend(&root) {
            TimeStrategyResult::Expired => {},
            _ => panic!("expected the extension to be spent")
        }
    }
}
