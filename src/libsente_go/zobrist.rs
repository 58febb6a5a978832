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

//! Process-wide Zobrist tables, filled once from a deterministic seed
//! before any board is touched. Each 64-bit constant is two 32-bit
//! generator outputs concatenated.

use sente_utils::config;
use sente_utils::rng::Rng;

use crate::vertex::MAXSQ;

/// Starting value of both hashes, so an empty table never hashes to zero.
pub const HASH_SEED: u64 = 0x1234567887654321;

/// XOR-ed into the full hash whenever black is the side to move.
pub const BLACK_TO_MOVE: u64 = 0xABCDABCDABCDABCD;

pub struct Zobrist {
    /// One constant per (color slot, point). Slots 0 and 1 are the stone
    /// colors, slot 2 is empty, slot 3 doubles as the ko-capture slot.
    pub table: Box<[[u64; MAXSQ]; 4]>,

    /// One constant per pass-counter value.
    pub pass: [u64; 5]
}

fn draw(rng: &mut Rng) -> u64 {
    ((rng.uint32() as u64) << 32) ^ (rng.uint32() as u64)
}

impl Zobrist {
    fn new(seed: u64) -> Zobrist {
        let mut rng = Rng::new(seed);
        let mut table = Box::new([[0; MAXSQ]; 4]);
        let mut pass = [0; 5];

        for slot in table.iter_mut() {
            for entry in slot.iter_mut() {
                *entry = draw(&mut rng);
            }
        }

        for entry in pass.iter_mut() {
            *entry = draw(&mut rng);
        }

        Zobrist { table, pass }
    }
}

lazy_static! {
    pub static ref ZOBRIST: Zobrist = Zobrist::new(*config::RNG_SEED);
}
