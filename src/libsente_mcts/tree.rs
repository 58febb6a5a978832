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

//! The search tree. Nodes are shared between worker threads with nothing
//! but per-field atomics; the children list is written once by the thread
//! that wins the expansion race and published with a release store on
//! `expand_state`, after which it is immutable.
//!
//! Evaluation sums are accumulated from black's perspective. Win rates
//! are read out from the perspective of whichever side is asking.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicI32, AtomicU32, AtomicU64, AtomicU8, Ordering};

use ordered_float::OrderedFloat;

use sente_go::{Color, Vertex};
use sente_utils::config;

const UNEXPANDED: u8 = 0;
const EXPANDING: u8 = 1;
const EXPANDED: u8 = 2;

/// Children whose prior falls below this are never created.
const PRIOR_EPSILON: f32 = 1e-8;

pub struct Node {
    /// The move that led to this node.
    vertex: Vertex,

    /// The player to move at this node.
    to_move: Color,

    /// Prior probability from the parent's policy.
    prior: f32,

    visits: AtomicI32,
    virtual_loss: AtomicI32,

    /// Sum of evaluations from black's perspective, as f64 bits.
    black_evals: AtomicU64,

    /// The first evaluation this node received, from black's
    /// perspective, readable as soon as the node is published.
    initial_value: AtomicU32,

    expand_state: AtomicU8,
    children: UnsafeCell<Vec<Node>>
}

unsafe impl Send for Node {}
unsafe impl Sync for Node {}

impl Node {
    pub fn new(to_move: Color, vertex: Vertex, prior: f32) -> Node {
        Node {
            vertex,
            to_move,
            prior,
            visits: AtomicI32::new(0),
            virtual_loss: AtomicI32::new(0),
            black_evals: AtomicU64::new(0f64.to_bits()),
            initial_value: AtomicU32::new(0.5f32.to_bits()),
            expand_state: AtomicU8::new(UNEXPANDED),
            children: UnsafeCell::new(vec![])
        }
    }

    pub fn vertex(&self) -> Vertex {
        self.vertex
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn prior(&self) -> f32 {
        self.prior
    }

    pub fn set_prior(&mut self, prior: f32) {
        self.prior = prior;
    }

    pub fn visits(&self) -> i32 {
        self.visits.load(Ordering::Acquire)
    }

    pub fn virtual_loss(&self) -> i32 {
        self.virtual_loss.load(Ordering::Acquire)
    }

    pub fn black_evals(&self) -> f64 {
        f64::from_bits(self.black_evals.load(Ordering::Acquire))
    }

    /// The first evaluation backed up through this node, from black's
    /// perspective.
    pub fn initial_value(&self) -> f32 {
        f32::from_bits(self.initial_value.load(Ordering::Acquire))
    }

    pub fn is_expanded(&self) -> bool {
        self.expand_state.load(Ordering::Acquire) == EXPANDED
    }

    /// Attempts to win the expansion race. Exactly one caller per node
    /// ever sees `true`; everyone else treats the node as a leaf until it
    /// is published.
    pub fn try_mark_expanding(&self) -> bool {
        self.expand_state
            .compare_exchange(UNEXPANDED, EXPANDING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Installs the children and publishes the node. Only the thread that
    /// won `try_mark_expanding` may call this, exactly once.
    pub fn expand(&self, moves: Vec<(f32, Vertex)>, initial_value: f32) {
        debug_assert_eq!(self.expand_state.load(Ordering::Acquire), EXPANDING);

        let next = self.to_move.opposite();
        let children = moves.into_iter()
            .filter(|&(prior, _)| prior > PRIOR_EPSILON)
            .map(|(prior, vertex)| Node::new(next, vertex, prior))
            .collect();

        unsafe {
            *self.children.get() = children;
        }

        self.initial_value.store(initial_value.to_bits(), Ordering::Release);
        self.expand_state.store(EXPANDED, Ordering::Release);
    }

    /// The children, if the node has been published.
    pub fn children(&self) -> Option<&[Node]> {
        if self.is_expanded() {
            Some(unsafe { &*self.children.get() })
        } else {
            None
        }
    }

    /// Mutable access to the children; only possible while no worker
    /// shares the node.
    pub fn children_mut(&mut self) -> Option<&mut [Node]> {
        if self.is_expanded() {
            Some(unsafe { &mut *self.children.get() })
        } else {
            None
        }
    }

    pub fn add_virtual_loss(&self) {
        self.virtual_loss.fetch_add(1, Ordering::AcqRel);
    }

    pub fn remove_virtual_loss(&self) {
        self.virtual_loss.fetch_sub(1, Ordering::AcqRel);
    }

    /// Backs one evaluation (black's perspective) into this node.
    pub fn update(&self, black_value: f64) {
        self.black_evals
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + black_value).to_bits())
            })
            .expect("could not update evaluation sum");
        self.visits.fetch_add(1, Ordering::AcqRel);
    }

    /// Overwrites the statistics wholesale; used when the transposition
    /// table knows more about this position than the tree does.
    pub fn set_stats(&self, visits: i32, black_evals: f64) {
        self.black_evals.store(black_evals.to_bits(), Ordering::Release);
        self.visits.store(visits, Ordering::Release);
    }

    /// The mean evaluation from the given color's perspective.
    pub fn winrate_for(&self, color: Color) -> f64 {
        let visits = self.visits();
        let mean = if visits > 0 {
            self.black_evals() / visits as f64
        } else {
            self.initial_value() as f64
        };

        match color {
            Color::Black => mean,
            Color::White => 1.0 - mean
        }
    }

    /// The mean evaluation from this node's side to move.
    pub fn winrate(&self) -> f64 {
        self.winrate_for(self.to_move)
    }

    /// PUCT selection among the children, with virtual losses counted as
    /// pending losses and unvisited children given first-play urgency.
    /// Ties break towards the higher prior, then the lower child index.
    pub fn select_child(&self) -> Option<&Node> {
        let children = self.children()?;

        if children.is_empty() {
            return None;
        }

        let color = self.to_move;
        let loss_weight = *config::VIRTUAL_LOSS as i64;
        let c_puct = *config::CPUCT;
        let fpu_q = (self.winrate_for(color) as f32 - *config::FPU_REDUCE).max(0.0);

        let total: i64 = children.iter()
            .map(|child| child.visits() as i64 + loss_weight * child.virtual_loss() as i64)
            .sum();
        let sqrt_total = (total as f32).sqrt();

        let mut best: Option<&Node> = None;
        let mut best_score = ::std::f32::NEG_INFINITY;
        let mut best_prior = ::std::f32::NEG_INFINITY;

        for child in children {
            let visits = child.visits() as i64;
            let pending = loss_weight * child.virtual_loss() as i64;
            let n = visits + pending;

            let q = if n > 0 {
                // virtual losses contribute to the denominator only
                let wins = match color {
                    Color::Black => child.black_evals(),
                    Color::White => visits as f64 - child.black_evals()
                };

                (wins / n as f64) as f32
            } else {
                fpu_q
            };

            let u = c_puct * child.prior * sqrt_total / (1 + n) as f32;
            let score = q + u;

            if score > best_score || (score == best_score && child.prior > best_prior) {
                best = Some(child);
                best_score = score;
                best_prior = child.prior;
            }
        }

        best
    }

    /// The child to actually play: most visits, ties by higher mean
    /// value from this node's perspective.
    pub fn best(&self) -> Option<&Node> {
        let children = self.children()?;
        let color = self.to_move;

        children.iter().max_by_key(|child| {
            (child.visits(), OrderedFloat(child.winrate_for(color)))
        })
    }

    /// The most-visited line from this node, at most `depth` long.
    pub fn principal_variation(&self, depth: usize) -> Vec<Vertex> {
        let mut line = Vec::with_capacity(depth);
        let mut node = self;

        while line.len() < depth {
            match node.best() {
                Some(child) if child.visits() > 0 => {
                    line.push(child.vertex());
                    node = child;
                },
                _ => break
            }
        }

        line
    }

    /// Consumes the tree and returns the subtree under the given move,
    /// for reuse as the next search's root.
    pub fn forward(self, vertex: Vertex) -> Option<Node> {
        if !self.is_expanded() {
            return None;
        }

        self.children.into_inner().into_iter().find(|child| child.vertex() == vertex)
    }
}
