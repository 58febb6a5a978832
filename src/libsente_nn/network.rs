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

//! The evaluator: position in, policy and winrate out. Features are
//! rotated by one of the eight symmetries before the forward pass and
//! the policy is un-rotated afterwards, so the tree never sees the
//! symmetry. Evaluations serialize on the single workspace, which is the
//! device lock of the concurrency model.

use std::path::Path;
use std::sync::Mutex;

use sente_go::features::{self, FEATURE_SIZE, NUM_SQUARES};
use sente_go::symmetry::Transform;
use sente_go::{GameState, Vertex, MAXBOARDSIZE};
use sente_utils::config;
use sente_utils::rng::with_rng;

use crate::cache::Cache;
use crate::error::Error;
use crate::graph::{Graph, Workspace};
use crate::loader::{self, Weights, NUM_ACTIONS};

/// How the evaluation is ensembled over the board symmetries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ensemble {
    /// Use the given symmetry, `0..8`.
    Direct(usize),

    /// Draw a symmetry uniformly at random.
    RandomRotation
}

/// Priors over the playable vertices (empty squares plus pass) and the
/// winrate for the side to move.
pub type ScoredMoves = (Vec<(f32, Vertex)>, f32);

pub struct Network {
    graph: Graph,
    workspace: Mutex<Workspace>,
    cache: Cache
}

impl Network {
    pub fn from_file(path: &Path) -> Result<Network, Error> {
        Ok(Network::from_weights(loader::load(path)?))
    }

    pub fn from_weights(weights: Weights) -> Network {
        let graph = Graph::new(weights);
        let workspace = Mutex::new(graph.workspace());

        Network { graph, workspace, cache: Cache::new() }
    }

    pub fn residual_blocks(&self) -> usize {
        self.graph.residual_blocks()
    }

    pub fn channels(&self) -> usize {
        self.graph.channels()
    }

    /// Evaluates the position for the side to move. Returns `None` if the
    /// board is not the size the network was trained for. The state is
    /// walked backward for the history planes and restored before
    /// returning.
    pub fn get_scored_moves(&self, state: &mut GameState, ensemble: Ensemble) -> Option<ScoredMoves> {
        if state.size() != MAXBOARDSIZE {
            return None;
        }

        let rotation = match ensemble {
            Ensemble::Direct(rotation) => {
                debug_assert!(rotation < 8);
                rotation
            },
            Ensemble::RandomRotation => with_rng(|rng| rng.uint32_max(8)) as usize
        };

        let hash = state.board().hash();
        let entry = {
            let scratch = &mut *state;

            self.cache.get_or_insert(hash, rotation, move || self.evaluate(scratch, rotation))
        };
        let (winrate, policy) = (entry.0, &entry.1);

        let board = state.board();
        let mut moves = Vec::with_capacity(NUM_ACTIONS);

        for index in 0..NUM_SQUARES {
            let (x, y) = (index % MAXBOARDSIZE, index / MAXBOARDSIZE);
            let vertex = board.vertex(x, y);

            if board.at(vertex).is_none() {
                moves.push((policy[index], Vertex::Point(vertex)));
            }
        }

        moves.push((policy[NUM_SQUARES], Vertex::Pass));

        // the softmax mass that sat on occupied vertices is gone, so
        // renormalize over what is left
        let sum: f32 = moves.iter().map(|&(prior, _)| prior).sum();

        if sum > 1e-6 {
            for entry in &mut moves {
                entry.0 /= sum;
            }
        }

        Some((moves, winrate))
    }

    fn evaluate(&self, state: &mut GameState, rotation: usize) -> (f32, Vec<f32>) {
        let planes = features::gather_features(state);
        let t = Transform::from_index(rotation);

        let mut input = vec![0.0; FEATURE_SIZE];

        for c in 0..features::NUM_FEATURES {
            for index in 0..NUM_SQUARES {
                input[c * NUM_SQUARES + index] = planes[c * NUM_SQUARES + t.apply(index)];
            }
        }

        let (logits, raw_value) = {
            let mut ws = self.workspace.lock().expect("could not acquire workspace lock");

            self.graph.forward(&mut ws, &input)
        };

        let softmaxed = softmax(&logits, *config::SOFTMAX_TEMP);
        let mut policy = vec![0.0; NUM_ACTIONS];

        policy[NUM_SQUARES] = softmaxed[NUM_SQUARES];
        for index in 0..NUM_SQUARES {
            policy[t.apply(index)] = softmaxed[index];
        }

        let winrate = 0.5 * (1.0 + raw_value.tanh());

        (winrate, policy)
    }
}

/// Numerically stable softmax with a temperature.
pub fn softmax(input: &[f32], temperature: f32) -> Vec<f32> {
    let alpha = input.iter().cloned().fold(::std::f32::NEG_INFINITY, f32::max) / temperature;
    let mut output = Vec::with_capacity(input.len());
    let mut denominator = 0.0;

    for &value in input {
        let exp = ((value / temperature) - alpha).exp();

        output.push(exp);
        denominator += exp;
    }

    for value in &mut output {
        *value /= denominator;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::test_utils;
    use sente_go::Color;

    #[test]
    fn softmax_sums_to_one() {
        let input = (0..362).map(|i| (i % 7) as f32 - 3.0).collect::<Vec<_>>();
        let output = softmax(&input, 1.0);

        let sum: f32 = output.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(output.iter().all(|&p| p > 0.0));
    }

    #[test]
    fn softmax_temperature_flattens() {
        let input = vec![0.0, 1.0];
        let cold = softmax(&input, 0.5);
        let hot = softmax(&input, 5.0);

        assert!(cold[1] > hot[1]);
        assert!(hot[1] > 0.5);
    }

    #[test]
    fn zero_network_is_uniform_and_even() {
        let network = Network::from_weights(test_utils::weights(4, 1, "0"));
        let mut state = GameState::new(19);

        let (moves, winrate) = network
            .get_scored_moves(&mut state, Ensemble::Direct(0))
            .expect("missing evaluation");

        assert_eq!(winrate, 0.5);
        assert_eq!(moves.len(), 362);

        let first = moves[0].0;
        assert!(moves.iter().all(|&(p, _)| (p - first).abs() < 1e-6));
    }

    #[test]
    fn value_is_rotation_invariant_on_empty_board() {
        let network = Network::from_weights(test_utils::weights(4, 1, "0.03125"));
        let mut state = GameState::new(19);

        let mut values = vec![];
        for rotation in 0..8 {
            let (_, winrate) = network
                .get_scored_moves(&mut state, Ensemble::Direct(rotation))
                .expect("missing evaluation");

            values.push(winrate);
        }

        for &value in &values[1..] {
            assert!((value - values[0]).abs() <= 5e-3, "values diverge: {:?}", values);
        }
    }

    #[test]
    fn evaluation_leaves_state_untouched() {
        let network = Network::from_weights(test_utils::weights(4, 1, "0"));
        let mut state = GameState::new(19);

        state.play_move(Color::Black, Vertex::from_coords(19, 3, 3)).expect("legal move");

        let before = state.ko_state().clone();
        let _ = network.get_scored_moves(&mut state, Ensemble::RandomRotation);

        assert!(state.ko_state() == &before);
    }

    #[test]
    fn occupied_vertices_are_masked() {
        let network = Network::from_weights(test_utils::weights(4, 1, "0"));
        let mut state = GameState::new(19);
        let stone = Vertex::from_coords(19, 3, 3);

        state.play_move(Color::Black, stone).expect("legal move");

        let (moves, _) = network
            .get_scored_moves(&mut state, Ensemble::Direct(0))
            .expect("missing evaluation");

        assert_eq!(moves.len(), 361);
        assert!(moves.iter().all(|&(_, v)| v != stone));
        assert!(moves.iter().any(|&(_, v)| v == Vertex::Pass));

        // the policy is renormalized over the remaining moves
        let sum: f32 = moves.iter().map(|&(p, _)| p).sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn wrong_board_size_is_refused() {
        let network = Network::from_weights(test_utils::weights(4, 1, "0"));
        let mut state = GameState::new(9);

        assert!(network.get_scored_moves(&mut state, Ensemble::RandomRotation).is_none());
    }
}
