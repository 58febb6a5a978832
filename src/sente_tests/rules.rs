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

//! Rules-level scenarios: ko, superko, suicide, and history navigation.

use sente_go::{Color, GameState, Vertex};
use sente_utils::rng::Rng;

fn pt(size: usize, x: usize, y: usize) -> Vertex {
    Vertex::from_coords(size, x, y)
}

/// The canonical ko: black captures, white may not recapture at once,
/// both sides play elsewhere, then white recaptures legally.
#[test]
fn ko_capture_and_delayed_recapture() {
    let mut game = GameState::new(19);

    for &(color, x, y) in &[
        (Color::Black, 2, 3), (Color::White, 5, 3),
        (Color::Black, 3, 2), (Color::White, 4, 2),
        (Color::Black, 3, 4), (Color::White, 4, 4),
        (Color::White, 3, 3)
    ] {
        game.play_move(color, pt(19, x, y)).expect("setup move is legal");
    }

    // black captures the ko
    let take = pt(19, 4, 3);
    assert_eq!(game.play_move(Color::Black, take), Ok(1));

    // the immediate recapture is rejected
    let retake = pt(19, 3, 3);
    assert!(game.play_move(Color::White, retake).is_err());

    // white plays elsewhere, black answers elsewhere
    game.play_move(Color::White, pt(19, 16, 16)).expect("legal move");
    game.play_move(Color::Black, pt(19, 16, 2)).expect("legal move");

    // now the recapture is legal again
    assert_eq!(game.play_move(Color::White, retake), Ok(1));
}

#[test]
fn suicide_in_a_surrounded_point_is_rejected() {
    let mut game = GameState::new(19);
    let hole = pt(19, 9, 9);

    // surround (9, 9) with white on an otherwise empty board
    for &(x, y) in &[(8, 9), (10, 9), (9, 8), (9, 10)] {
        game.play_move(Color::White, pt(19, x, y)).expect("setup move is legal");
    }

    assert!(game.play_move(Color::Black, hole).is_err());
    assert!(game.play_move(Color::White, hole).is_ok());
}

/// Ten random legal moves, ten undos, ten redos: the hashes retrace the
/// forward sequence exactly.
#[test]
fn undo_redo_idempotence() {
    let mut game = GameState::new(19);
    let mut rng = Rng::new(1234);
    let mut trail = vec![(game.board().hash(), game.board().ko_hash())];

    while trail.len() < 11 {
        let x = rng.uint32_max(19) as usize;
        let y = rng.uint32_max(19) as usize;

        if game.play(pt(19, x, y)).is_ok() {
            trail.push((game.board().hash(), game.board().ko_hash()));
        }
    }

    for step in (0..10).rev() {
        assert!(game.undo_move());
        assert_eq!((game.board().hash(), game.board().ko_hash()), trail[step]);
    }

    for step in 1..11 {
        assert!(game.forward_move());
        assert_eq!((game.board().hash(), game.board().ko_hash()), trail[step]);
    }
}

/// The superko history matches positions, not move sequences: a position
/// reached by a different order of the same moves is no repetition.
#[test]
fn transpositions_are_not_superko() {
    let mut game = GameState::new(19);

    game.play_move(Color::Black, pt(19, 3, 3)).expect("legal move");
    game.play_move(Color::White, pt(19, 15, 15)).expect("legal move");
    game.play_move(Color::Black, pt(19, 3, 15)).expect("legal move");

    // a different continuation, not a recreation of anything
    assert!(game.play_move(Color::White, pt(19, 15, 3)).is_ok());
}
