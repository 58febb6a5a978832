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

//! The transposition table: accumulated search statistics keyed by the
//! full position hash, shared by every tree position in the process. One
//! coarse mutex guards it; the entries are small enough that the critical
//! section is a handful of loads and stores, and contention is bounded by
//! the playout rate rather than the thread count.

use std::sync::Mutex;

use sente_utils::config;

use crate::tree::Node;

#[derive(Copy, Clone, Default)]
struct TtEntry {
    hash: u64,
    visits: i32,
    black_evals: f64
}

pub struct TTable {
    buckets: Mutex<Vec<TtEntry>>
}

impl TTable {
    pub fn new(size: usize) -> TTable {
        TTable {
            buckets: Mutex::new(vec![TtEntry::default(); size])
        }
    }

    fn index(&self, buckets: &[TtEntry], hash: u64) -> usize {
        (hash % buckets.len() as u64) as usize
    }

    /// Stores the node's statistics under its position hash, overwriting
    /// whatever occupied the bucket.
    pub fn update(&self, hash: u64, node: &Node) {
        let mut buckets = self.buckets.lock().expect("could not acquire transposition table lock");
        let index = self.index(&buckets, hash);

        buckets[index] = TtEntry {
            hash,
            visits: node.visits(),
            black_evals: node.black_evals()
        };
    }

    /// Imports the stored statistics into the node iff the full hash
    /// matches and the entry has seen more visits than the node. A bucket
    /// collision is silently ignored.
    pub fn sync(&self, hash: u64, node: &Node) {
        let buckets = self.buckets.lock().expect("could not acquire transposition table lock");
        let index = self.index(&buckets, hash);
        let entry = buckets[index];

        if entry.hash != hash {
            return;
        }

        if entry.visits > node.visits() {
            node.set_stats(entry.visits, entry.black_evals);
        }
    }
}

lazy_static! {
    /// The process-wide table every search shares.
    pub static ref TT: TTable = TTable::new(*config::TT_SIZE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use sente_go::{Color, Vertex};

    #[test]
    fn sync_imports_better_knowledge() {
        let tt = TTable::new(64);
        let seen = Node::new(Color::Black, Vertex::Pass, 1.0);

        for _ in 0..5 {
            seen.update(0.8);
        }
        tt.update(0xDEAD, &seen);

        let fresh = Node::new(Color::Black, Vertex::Pass, 1.0);
        tt.sync(0xDEAD, &fresh);

        assert_eq!(fresh.visits(), 5);
        assert!((fresh.winrate_for(Color::Black) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn sync_never_downgrades() {
        let tt = TTable::new(64);
        let poor = Node::new(Color::Black, Vertex::Pass, 1.0);

        poor.update(0.1);
        tt.update(0xBEEF, &poor);

        let rich = Node::new(Color::Black, Vertex::Pass, 1.0);
        for _ in 0..10 {
            rich.update(0.9);
        }
        tt.sync(0xBEEF, &rich);

        assert_eq!(rich.visits(), 10);
    }

    #[test]
    fn hash_mismatch_is_ignored() {
        let tt = TTable::new(1);
        let node = Node::new(Color::Black, Vertex::Pass, 1.0);

        for _ in 0..5 {
            node.update(1.0);
        }
        tt.update(1, &node);

        // a different hash lands in the same (only) bucket
        let other = Node::new(Color::Black, Vertex::Pass, 1.0);
        tt.sync(2, &other);

        assert_eq!(other.visits(), 0);
    }
}
