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

//! The search driver: fans worker threads out over one shared tree until
//! the budget runs out, then picks the most visited root child. Workers
//! coordinate only through the atomic node fields and the virtual-loss
//! mechanism; the sole blocking waits on the hot path are the evaluator's
//! workspace lock and the transposition table mutex.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_utils::Backoff;
use log::{debug, info};

use sente_go::score;
use sente_go::{Color, GameState, Vertex};
use sente_utils::config;
use sente_utils::pool::THREAD_POOL;

use crate::dirichlet;
use crate::predict::Predictor;
use crate::time_control::{self, TimeStrategy};
use crate::tree::Node;
use crate::tt::{TTable, TT};

lazy_static! {
    /// Cooperative cancellation, polled between playouts.
    static ref STOP: AtomicBool = AtomicBool::new(false);
}

/// Asks every running search to stop after its current playout.
pub fn request_stop() {
    STOP.store(true, Ordering::Release);
}

/// The game result from black's perspective once both sides have passed.
fn terminal_value(state: &GameState) -> f64 {
    let margin = score::area_score(state.board(), state.komi());

    if margin > 0.0 {
        1.0
    } else if margin < 0.0 {
        0.0
    } else {
        0.5
    }
}

/// One playout: descend from `node` with virtual losses, expand or score
/// the leaf, and back the evaluation up the unwind path. Returns the
/// backed-up value from black's perspective, or `None` if the playout
/// had to be abandoned (the tree has no playable continuation, or the
/// evaluator refused the position).
pub fn play_simulation(
    server: &dyn Predictor,
    state: &mut GameState,
    node: &Node,
    tt: &TTable
) -> Option<f64> {
    let hash = state.board().hash();

    node.add_virtual_loss();

    let value = if state.board().passes() >= 2 {
        // both sides passed: the game is over, score it
        Some(terminal_value(state))
    } else if node.is_expanded() {
        match node.select_child() {
            Some(child) => {
                if state.play_move(node.to_move(), child.vertex()).is_ok() {
                    play_simulation(server, state, child, tt)
                } else {
                    None
                }
            },
            None => None
        }
    } else if node.try_mark_expanding() {
        match server.predict(state) {
            Some((moves, winrate)) => {
                let to_move = node.to_move();
                let legal = moves.into_iter()
                    .filter(|&(_, vertex)| state.is_legal(to_move, vertex))
                    .collect();
                let black_value = match to_move {
                    Color::Black => winrate as f64,
                    Color::White => 1.0 - winrate as f64
                };

                node.expand(legal, black_value as f32);
                tt.sync(hash, node);
                Some(black_value)
            },
            None => {
                // publish the node anyway so waiters cannot spin forever
                node.expand(vec![], 0.5);
                None
            }
        }
    } else {
        // lost the expansion race: hold the virtual loss until the
        // winner publishes, then back up its stored evaluation without
        // evaluating again
        let backoff = Backoff::new();

        while !node.is_expanded() {
            backoff.snooze();
        }

        Some(node.initial_value() as f64)
    };

    match value {
        Some(value) => {
            node.update(value);
            node.remove_virtual_loss();
            tt.update(hash, node);
            Some(value)
        },
        None => {
            node.remove_virtual_loss();
            None
        }
    }
}

/// Logs the root statistics and the principal variation.
fn dump_stats(root: &Node, size: usize) {
    let children = match root.children() {
        Some(children) => children,
        None => return
    };
    let color = root.to_move();

    let mut order: Vec<&Node> = children.iter().filter(|c| c.visits() > 0).collect();
    order.sort_by_key(|c| -c.visits());

    for child in order.iter().take(10) {
        let pv = child.principal_variation(3).iter()
            .map(|v| v.to_text(size))
            .collect::<Vec<_>>()
            .join(" ");

        debug!(
            "{:>4} -> {:7} visits, {:5.2}% winrate, {:5.2}% prior, pv: {} {}",
            child.vertex().to_text(size),
            child.visits(),
            100.0 * child.winrate_for(color),
            100.0 * child.prior(),
            child.vertex().to_text(size),
            pv
        );
    }
}

/// Searches the given position until the time strategy is done and
/// returns `(winrate, move, tree)`. The tree may be fed back in as
/// `starting_tree` for the next call once the chosen move is played.
pub fn think(
    server: Arc<dyn Predictor>,
    state: &GameState,
    time_strategy: Box<dyn TimeStrategy + Send + Sync>,
    starting_tree: Option<Node>
) -> Option<(f32, Vertex, Node)> {
    let to_move = state.to_move();

    let mut root = match starting_tree {
        Some(tree) if tree.to_move() == to_move => tree,
        _ => Node::new(to_move, state.board().last_move(), 1.0)
    };

    STOP.store(false, Ordering::Release);

    if !root.is_expanded() {
        let mut scratch = state.clone();

        play_simulation(server.as_ref(), &mut scratch, &root, &TT)?;
    }

    if *config::SELF_PLAY {
        if let Some(children) = root.children_mut() {
            dirichlet::add(children, *config::DIRICHLET_ALPHA, *config::NOISE_FRAC);
        }
    }

    let root = Arc::new(root);
    let strategy: Arc<dyn TimeStrategy + Send + Sync> = Arc::from(time_strategy);
    let group = THREAD_POOL.group();

    for _ in 0..*config::NUM_THREADS {
        let root = root.clone();
        let state = state.clone();
        let strategy = strategy.clone();
        let server = server.clone();

        group.add(move || {
            while !STOP.load(Ordering::Acquire)
                && !time_control::is_done(&root, strategy.as_ref())
            {
                let mut scratch = state.clone();

                if play_simulation(server.as_ref(), &mut scratch, &root, &TT).is_none() {
                    break;
                }
            }
        });
    }

    group.wait_all();

    let root = Arc::try_unwrap(root).ok().expect("root still shared after the search");

    dump_stats(&root, state.size());

    let (vertex, value) = {
        let best = root.best()?;
        let value = best.winrate_for(to_move) as f32;
        let resign = !*config::NO_RESIGN && value < *config::RESIGN_THRESHOLD;

        if resign {
            (Vertex::Resign, value)
        } else {
            (best.vertex(), value)
        }
    };

    info!(
        "playing {} with {:.1}% winrate after {} playouts",
        vertex.to_text(state.size()),
        100.0 * value,
        root.visits()
    );

    Some((value, vertex, root))
}
