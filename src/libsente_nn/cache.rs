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

//! A process-lifetime cache of network evaluations, keyed by the full
//! position hash and the symmetry the features were rotated by.

use std::sync::Arc;

use dashmap::DashMap;

/// The cache stops growing once it holds this many entries.
const MAX_ENTRIES: usize = 200_000;

pub struct Cache {
    entries: DashMap<(u64, usize), Arc<(f32, Vec<f32>)>>
}

impl Cache {
    pub fn new() -> Cache {
        Cache { entries: DashMap::new() }
    }

    /// Returns the cached `(value, policy)` for the key, computing and
    /// inserting it if absent.
    pub fn get_or_insert<F>(&self, hash: u64, rotation: usize, compute: F) -> Arc<(f32, Vec<f32>)>
        where F: FnOnce() -> (f32, Vec<f32>)
    {
        if let Some(entry) = self.entries.get(&(hash, rotation)) {
            return entry.clone();
        }

        let value = Arc::new(compute());

        if self.entries.len() < MAX_ENTRIES {
            self.entries.insert((hash, rotation), value.clone());
        }

        value
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
