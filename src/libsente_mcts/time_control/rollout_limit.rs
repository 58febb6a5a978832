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

use crate::tree::Node;

use super::{TimeStrategy, TimeStrategyResult};

/// A fixed playout budget.
#[derive(Clone)]
pub struct RolloutLimit {
    limit: usize
}

impl RolloutLimit {
    pub fn new(limit: usize) -> RolloutLimit {
        RolloutLimit { limit }
    }
}

impl TimeStrategy for RolloutLimit {
    fn try_extend(&self, root: &Node) -> TimeStrategyResult {
        let visits = root.visits().max(0) as usize;

        if visits < self.limit {
            TimeStrategyResult::NotExpired(self.limit - visits)
        } else {
            TimeStrategyResult::Expired
        }
    }
}
