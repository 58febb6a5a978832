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

//! A board plus the positional-superko history: one `ko_hash` per
//! position since game start. A move is illegal if the position it
//! creates matches any entry.

use crate::board::{Board, MoveError};
use crate::color::Color;
use crate::vertex::Vertex;

#[derive(Clone, PartialEq)]
pub struct KoState {
    board: Board,
    ko_hash_history: Vec<u64>
}

impl KoState {
    pub fn new(size: usize) -> KoState {
        let board = Board::new(size);
        let ko_hash_history = vec![board.ko_hash()];

        KoState { board, ko_hash_history }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ko_hash_history(&self) -> &[u64] {
        &self.ko_hash_history
    }

    /// Checks a move against the board rules and positional superko. The
    /// superko probe replays the move on a scratch copy of the board,
    /// leaving `self` untouched.
    pub fn check(&self, color: Color, vertex: Vertex) -> Result<(), MoveError> {
        self.board.check(color, vertex)?;

        if let Vertex::Point(_) = vertex {
            let mut scratch = self.board.clone();

            scratch.play(color, vertex);

            if self.ko_hash_history.contains(&scratch.ko_hash()) {
                return Err(MoveError::Superko);
            }
        }

        Ok(())
    }

    pub fn is_legal(&self, color: Color, vertex: Vertex) -> bool {
        self.check(color, vertex).is_ok()
    }

    /// Plays a move (passes included) and records the resulting position
    /// in the superko history. The caller must have checked legality.
    pub fn play(&mut self, color: Color, vertex: Vertex) -> usize {
        let captured = self.board.play(color, vertex);

        self.ko_hash_history.push(self.board.ko_hash());
        captured
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
