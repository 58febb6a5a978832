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

//! Search scenarios: playout budgets, visit accounting, and
//! transposition sharing between move orders.

use std::sync::Arc;

use sente_go::{Color, GameState, Vertex};
use sente_mcts::predict::{BiasedPredictor, Predictor, UniformPredictor};
use sente_mcts::search::{self, play_simulation};
use sente_mcts::time_control::RolloutLimit;
use sente_mcts::tree::Node;
use sente_mcts::tt::{TTable, TT};

fn pt(size: usize, x: usize, y: usize) -> Vertex {
    Vertex::from_coords(size, x, y)
}

/// A 1600-playout search of the empty 19x19 board with a policy
/// concentrated on the center: the top root move collects the bulk of
/// the budget and sits in the central 9x9.
#[test]
fn empty_board_search_concentrates_on_the_center() {
    let state = GameState::new(19);
    let favorite = pt(19, 9, 9);
    let server: Arc<dyn Predictor> = Arc::new(BiasedPredictor { favorite, black_value: 0.5 });

    let (_, vertex, root) = search::think(
        server,
        &state,
        Box::new(RolloutLimit::new(1600)),
        None
    ).expect("search failed");

    let best = root.best().expect("no best child");
    assert!(best.visits() > 100, "only {} visits on the best child", best.visits());

    let (x, y) = vertex.to_coords(19).expect("not a point");
    assert!(x >= 5 && x <= 13 && y >= 5 && y <= 13, "{:?} is outside the center", (x, y));
}

/// Single-threaded playouts keep the root's visit accounting exact.
#[test]
fn root_visits_account_for_children() {
    let state = GameState::new(19);
    let root = Node::new(Color::Black, Vertex::Pass, 1.0);
    let tt = TTable::new(4096);

    for _ in 0..100 {
        let mut scratch = state.clone();

        play_simulation(&UniformPredictor, &mut scratch, &root, &tt)
            .expect("playout abandoned");
    }

    let child_visits: i32 = root.children().expect("not expanded").iter()
        .map(|c| c.visits())
        .sum();

    assert_eq!(root.visits(), child_visits + 1);
    assert_eq!(root.virtual_loss(), 0);
}

/// Two move orders reaching the same position share knowledge through
/// the transposition table: the second tree's root is born with the
/// first tree's visits.
#[test]
fn transposition_table_seeds_across_move_orders() {
    let moves_a = [
        (Color::Black, 3, 3), (Color::White, 15, 15),
        (Color::Black, 3, 15), (Color::White, 15, 3)
    ];
    let moves_b = [
        (Color::Black, 3, 15), (Color::White, 15, 3),
        (Color::Black, 3, 3), (Color::White, 15, 15)
    ];

    let mut first = GameState::new(19);
    for &(color, x, y) in &moves_a {
        first.play_move(color, pt(19, x, y)).expect("legal move");
    }

    let mut second = GameState::new(19);
    for &(color, x, y) in &moves_b {
        second.play_move(color, pt(19, x, y)).expect("legal move");
    }

    // the two positions are identical, down to the full hash
    assert_eq!(first.board().hash(), second.board().hash());

    // search the first and let it publish into the global table
    let server: Arc<dyn Predictor> = Arc::new(UniformPredictor);
    let (_, _, root) = search::think(
        server,
        &first,
        Box::new(RolloutLimit::new(300)),
        None
    ).expect("search failed");
    let searched = root.visits();
    assert!(searched > 1);

    // a fresh root for the transposed position imports those visits on
    // its very first expansion
    let fresh = Node::new(second.to_move(), second.board().last_move(), 1.0);

    play_simulation(&UniformPredictor, &mut second.clone(), &fresh, &TT)
        .expect("playout abandoned");

    assert!(
        fresh.visits() > 1,
        "expected the transposition entry to seed the root, got {} visits", fresh.visits()
    );
}

/// Resignation is surfaced as a move and recorded as a pass with the
/// resign marker.
#[test]
fn resignation_flows_through_the_game_state() {
    let mut game = GameState::new(19);

    game.play_move(Color::Black, Vertex::Resign).expect("resign is always legal");

    assert_eq!(game.resigned(), Some(Color::Black));
    assert_eq!(game.board().last_move(), Vertex::Resign);
    assert_eq!(game.board().passes(), 1);
}
