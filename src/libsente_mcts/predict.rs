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

//! The seam between the tree search and the evaluator. The search only
//! ever sees this trait, so tests (and a future batching service) can
//! stand in for the network.

use sente_go::{GameState, Vertex};
use sente_nn::{Ensemble, Network};

/// A function from position to `(priors over playable vertices, winrate
/// for the side to move)`. Implementations must leave the state
/// bit-identical.
pub trait Predictor: Send + Sync {
    fn predict(&self, state: &mut GameState) -> Option<(Vec<(f32, Vertex)>, f32)>;
}

impl Predictor for Network {
    fn predict(&self, state: &mut GameState) -> Option<(Vec<(f32, Vertex)>, f32)> {
        self.get_scored_moves(state, Ensemble::RandomRotation)
    }
}

/// Uniform priors over every empty vertex plus pass, winrate one half.
#[derive(Clone, Default)]
pub struct UniformPredictor;

impl Predictor for UniformPredictor {
    fn predict(&self, state: &mut GameState) -> Option<(Vec<(f32, Vertex)>, f32)> {
        let board = state.board();
        let size = board.size();
        let mut moves = vec![];

        for y in 0..size {
            for x in 0..size {
                let i = board.vertex(x, y);

                if board.at(i).is_none() {
                    moves.push(Vertex::Point(i));
                }
            }
        }

        moves.push(Vertex::Pass);

        let prior = 1.0 / moves.len() as f32;

        Some((moves.into_iter().map(|v| (prior, v)).collect(), 0.5))
    }
}

/// A predictor that always favors one vertex and always believes black
/// stands at `black_value`. Handy for steering test searches.
#[derive(Clone)]
pub struct BiasedPredictor {
    pub favorite: Vertex,
    pub black_value: f32
}

impl Predictor for BiasedPredictor {
    fn predict(&self, state: &mut GameState) -> Option<(Vec<(f32, Vertex)>, f32)> {
        let to_move = state.to_move();
        let (mut moves, _) = UniformPredictor.predict(state)?;
        let count = moves.len() as f32;

        for entry in &mut moves {
            entry.0 = if entry.1 == self.favorite { 0.9 } else { 0.1 / (count - 1.0) };
        }

        let value = match to_move {
            sente_go::Color::Black => self.black_value,
            sente_go::Color::White => 1.0 - self.black_value
        };

        Some((moves, value))
    }
}
