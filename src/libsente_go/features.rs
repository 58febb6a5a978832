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

//! Input featurization for the neural network. The board state for the
//! eight most recent positions is collected by walking the game history
//! backwards, then walking forward again so the caller's state is left
//! bit-identical.
//!
//! The planes, in CHW order:
//!
//!  1..8.  own stones, newest first
//!  9..16. opponent stones, newest first
//!  17.    all ones if black is to move
//!  18.    all ones if white is to move
//!
//! Missing history planes at the start of the game stay zero.

use crate::color::Color;
use crate::game_state::GameState;
use crate::vertex::MAXBOARDSIZE;

pub const NUM_FEATURES: usize = 18;
pub const NUM_SQUARES: usize = MAXBOARDSIZE * MAXBOARDSIZE;
pub const FEATURE_SIZE: usize = NUM_FEATURES * NUM_SQUARES;

pub fn gather_features(state: &mut GameState) -> Vec<f32> {
    debug_assert_eq!(state.size(), MAXBOARDSIZE);

    let to_move = state.to_move();
    let mut planes = vec![0.0f32; FEATURE_SIZE];

    let turn_plane = if to_move == Color::Black { 16 } else { 17 };
    for i in 0..NUM_SQUARES {
        planes[turn_plane * NUM_SQUARES + i] = 1.0;
    }

    let mut backtracks = 0;

    for h in 0..8 {
        for y in 0..MAXBOARDSIZE {
            for x in 0..MAXBOARDSIZE {
                let v = state.board().vertex(x, y);

                if let Some(color) = state.board().at(v) {
                    let plane = if color == to_move { h } else { 8 + h };
                    let index = y * MAXBOARDSIZE + x;

                    planes[plane * NUM_SQUARES + index] = 1.0;
                }
            }
        }

        if h < 7 {
            if !state.undo_move() {
                break;
            }

            backtracks += 1;
        }
    }

    for _ in 0..backtracks {
        state.forward_move();
    }

    planes
}
