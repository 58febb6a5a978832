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

//! Stones, groups, liberties, legality, and incremental hash
//! maintenance. Groups are kept as parent-pointer union-find forests with
//! a circular next-stone list per group and a pseudo-liberty counter
//! (every adjacency to an empty point counts once, so zero
//! pseudo-liberties is exact for capture detection). Exact liberty counts
//! are computed on demand by walking the group.

use std::fmt;

use crate::color::Color;
use crate::vertex::{Vertex, MAXSQ};
use crate::zobrist::{BLACK_TO_MOVE, HASH_SEED, ZOBRIST};

/// The contents of one entry of the bordered point array. The
/// discriminants are the Zobrist color slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Square {
    Black = 0,
    White = 1,
    Empty = 2,
    Invalid = 3
}

impl From<Color> for Square {
    fn from(color: Color) -> Square {
        match color {
            Color::Black => Square::Black,
            Color::White => Square::White
        }
    }
}

/// Why a move was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    Occupied,
    Suicide,
    Ko,
    Superko
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MoveError::Occupied => write!(f, "illegal move: vertex is not empty"),
            MoveError::Suicide => write!(f, "illegal move: suicide"),
            MoveError::Ko => write!(f, "illegal move: retakes ko"),
            MoveError::Superko => write!(f, "illegal move: repeats an earlier position")
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Board {
    size: usize,
    vertices: [Square; MAXSQ],

    /// Next stone in the same group, as a circular list.
    next: [u16; MAXSQ],

    /// Union-find parent. A point is a group representative iff it is its
    /// own parent.
    parent: [u16; MAXSQ],

    /// Pseudo-liberties of the group, valid at representatives only.
    libs: [u16; MAXSQ],

    /// Stone count of the group, valid at representatives only.
    stones: [u16; MAXSQ],

    to_move: Color,
    movenum: usize,
    passes: usize,

    /// The vertex that an immediate ko recapture would take, `0` if none.
    ko_move: usize,

    /// Recently played moves, newest at index 0.
    last_moves: [Vertex; 8],
    last_was_capture: bool,

    hash: u64,
    ko_hash: u64
}

impl Board {
    pub fn new(size: usize) -> Board {
        debug_assert!(size >= 2 && size + 2 <= MAXSQ / (size + 2));

        let mut board = Board {
            size,
            vertices: [Square::Invalid; MAXSQ],
            next: [0; MAXSQ],
            parent: [0; MAXSQ],
            libs: [0; MAXSQ],
            stones: [0; MAXSQ],
            to_move: Color::Black,
            movenum: 0,
            passes: 0,
            ko_move: 0,
            last_moves: [Vertex::Pass; 8],
            last_was_capture: false,
            hash: 0,
            ko_hash: 0
        };

        for y in 0..size {
            for x in 0..size {
                let i = board.vertex(x, y);

                board.vertices[i] = Square::Empty;
                board.parent[i] = i as u16;
                board.next[i] = i as u16;
            }
        }

        board.hash = board.calc_hash();
        board.ko_hash = board.calc_ko_hash();
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn movenum(&self) -> usize {
        self.movenum
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn ko_hash(&self) -> u64 {
        self.ko_hash
    }

    pub fn last_move(&self) -> Vertex {
        self.last_moves[0]
    }

    pub fn last_was_capture(&self) -> bool {
        self.last_was_capture
    }

    /// Returns the bordered index of the given zero-based coordinates.
    pub fn vertex(&self, x: usize, y: usize) -> usize {
        (y + 1) * (self.size + 2) + (x + 1)
    }

    pub fn square(&self, i: usize) -> Square {
        self.vertices[i]
    }

    /// Returns the stone at the given point, if any.
    pub fn at(&self, i: usize) -> Option<Color> {
        match self.vertices[i] {
            Square::Black => Some(Color::Black),
            Square::White => Some(Color::White),
            _ => None
        }
    }

    /// The four orthogonal neighbors. The sentinel border guarantees they
    /// are all in bounds.
    pub fn neighbors(&self, i: usize) -> [usize; 4] {
        let side = self.size + 2;

        [i - 1, i + 1, i - side, i + side]
    }

    fn find(&self, mut i: usize) -> usize {
        while self.parent[i] as usize != i {
            i = self.parent[i] as usize;
        }

        i
    }

    /// Recomputes the full hash from scratch. This is the oracle that the
    /// incremental maintenance in `play` is tested against.
    pub fn calc_hash(&self) -> u64 {
        let z = &*ZOBRIST;
        let mut hash = HASH_SEED;

        for i in 0..MAXSQ {
            hash ^= z.table[self.vertices[i] as usize][i];
        }

        hash ^= z.table[3][self.ko_move];
        hash ^= z.pass[self.passes];

        if self.to_move == Color::Black {
            hash ^= BLACK_TO_MOVE;
        }

        hash
    }

    /// Recomputes the positional-superko key (stone colors only) from
    /// scratch.
    pub fn calc_ko_hash(&self) -> u64 {
        let z = &*ZOBRIST;
        let mut hash = HASH_SEED;

        for i in 0..MAXSQ {
            hash ^= z.table[self.vertices[i] as usize][i];
        }

        hash
    }

    /// Returns the exact number of liberties of the group that the given
    /// point belongs to, or zero for an empty point.
    pub fn group_liberties(&self, i: usize) -> usize {
        if self.at(i).is_none() {
            return 0;
        }

        let root = self.find(i);
        let mut seen = [false; MAXSQ];
        let mut count = 0;
        let mut pos = root;

        loop {
            for n in self.neighbors(pos) {
                if self.vertices[n] == Square::Empty && !seen[n] {
                    seen[n] = true;
                    count += 1;
                }
            }

            pos = self.next[pos] as usize;

            if pos == root {
                break;
            }
        }

        count
    }

    /// Returns the number of stones in the group at the given point.
    pub fn group_stones(&self, i: usize) -> usize {
        if self.at(i).is_none() {
            0
        } else {
            self.stones[self.find(i)] as usize
        }
    }

    /// Returns true if playing `color` at `i` would leave the played
    /// group without liberties while capturing nothing.
    pub fn is_suicide(&self, color: Color, i: usize) -> bool {
        let own = Square::from(color);

        for n in self.neighbors(i) {
            if self.vertices[n] == Square::Empty {
                return false;
            }
        }

        for n in self.neighbors(i) {
            let square = self.vertices[n];

            if square == Square::Invalid {
                continue;
            }

            let libs = self.group_liberties(n);

            if square == own && libs > 1 {
                // the group keeps a liberty besides `i`
                return false;
            }

            if square != own && libs == 1 {
                // `i` fills the group's last liberty, capturing it
                return false;
            }
        }

        true
    }

    /// Checks a move against occupation, simple ko and suicide.
    /// Positional superko is the `KoState` layer's business.
    pub fn check(&self, color: Color, vertex: Vertex) -> Result<(), MoveError> {
        match vertex {
            Vertex::Pass | Vertex::Resign => Ok(()),
            Vertex::Point(i) => {
                if i >= MAXSQ || self.vertices[i] != Square::Empty {
                    Err(MoveError::Occupied)
                } else if i == self.ko_move {
                    Err(MoveError::Ko)
                } else if self.is_suicide(color, i) {
                    Err(MoveError::Suicide)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn is_legal(&self, color: Color, vertex: Vertex) -> bool {
        self.check(color, vertex).is_ok()
    }

    /// Hands the turn to the given color, keeping the hash consistent.
    pub fn set_to_move(&mut self, color: Color) {
        if self.to_move != color {
            self.hash ^= BLACK_TO_MOVE;
            self.to_move = color;
        }
    }

    fn set_passes_hashed(&mut self, passes: usize) {
        let z = &*ZOBRIST;

        self.hash ^= z.pass[self.passes];
        self.passes = passes.min(4);
        self.hash ^= z.pass[self.passes];
    }

    fn set_ko_hashed(&mut self, ko_move: usize) {
        let z = &*ZOBRIST;

        self.hash ^= z.table[3][self.ko_move];
        self.hash ^= z.table[3][ko_move];
        self.ko_move = ko_move;
    }

    fn push_last_move(&mut self, vertex: Vertex) {
        for i in (1..8).rev() {
            self.last_moves[i] = self.last_moves[i - 1];
        }

        self.last_moves[0] = vertex;
    }

    /// Removes the group rooted at `root` from the board, updating both
    /// hashes and returning every adjacent group its pseudo-liberties.
    fn remove_group(&mut self, root: usize) -> usize {
        let z = &*ZOBRIST;
        let slot = self.vertices[root] as usize;
        let mut points = Vec::with_capacity(self.stones[root] as usize);
        let mut pos = root;

        loop {
            points.push(pos);
            pos = self.next[pos] as usize;

            if pos == root {
                break;
            }
        }

        for &p in &points {
            self.hash ^= z.table[slot][p] ^ z.table[2][p];
            self.ko_hash ^= z.table[slot][p] ^ z.table[2][p];
            self.vertices[p] = Square::Empty;
            self.parent[p] = p as u16;
            self.next[p] = p as u16;
            self.libs[p] = 0;
            self.stones[p] = 0;
        }

        for &p in &points {
            for n in self.neighbors(p) {
                if self.at(n).is_some() {
                    let r = self.find(n);
                    self.libs[r] += 1;
                }
            }
        }

        points.len()
    }

    fn merge_groups(&mut self, a: usize, b: usize) {
        debug_assert!(a != b);

        self.parent[b] = a as u16;
        self.stones[a] += self.stones[b];
        self.libs[a] += self.libs[b];

        // splice the two circular stone lists
        let tmp = self.next[a];
        self.next[a] = self.next[b];
        self.next[b] = tmp;
    }

    /// Plays a stone, resolving merges and captures. The caller must have
    /// checked legality; returns the number of stones captured.
    fn play_at(&mut self, color: Color, i: usize) -> usize {
        debug_assert_eq!(self.vertices[i], Square::Empty);

        let z = &*ZOBRIST;
        let own = Square::from(color);

        self.set_passes_hashed(0);

        // place the stone as a fresh single-stone group
        self.hash ^= z.table[2][i] ^ z.table[own as usize][i];
        self.ko_hash ^= z.table[2][i] ^ z.table[own as usize][i];
        self.vertices[i] = own;
        self.parent[i] = i as u16;
        self.next[i] = i as u16;
        self.stones[i] = 1;
        self.libs[i] = self.neighbors(i).iter()
            .filter(|&&n| self.vertices[n] == Square::Empty)
            .count() as u16;

        // every adjacent group loses the pseudo-liberty it had at `i`,
        // once per adjacency
        for n in self.neighbors(i) {
            if self.at(n).is_some() {
                let r = self.find(n);
                self.libs[r] -= 1;
            }
        }

        for n in self.neighbors(i) {
            if self.vertices[n] == own {
                let a = self.find(i);
                let b = self.find(n);

                if a != b {
                    self.merge_groups(a, b);
                }
            }
        }

        let mut captured = 0;
        let mut last_captured = 0;

        for n in self.neighbors(i) {
            if self.at(n).is_some() && self.vertices[n] != own {
                let r = self.find(n);

                if self.libs[r] == 0 {
                    if self.stones[r] == 1 {
                        last_captured = r;
                    }

                    captured += self.remove_group(r);
                }
            }
        }

        let root = self.find(i);
        debug_assert!(captured > 0 || self.libs[root] > 0, "suicide must be rejected before commit");

        let ko_move = if captured == 1 && self.stones[root] == 1 && self.group_liberties(root) == 1 {
            last_captured
        } else {
            0
        };

        self.set_ko_hashed(ko_move);
        self.set_to_move(color.opposite());
        self.movenum += 1;
        self.push_last_move(Vertex::Point(i));
        self.last_was_capture = captured > 0;

        captured
    }

    fn play_pass(&mut self, color: Color) {
        self.set_ko_hashed(0);
        self.set_passes_hashed(self.passes + 1);
        self.set_to_move(color.opposite());
        self.movenum += 1;
        self.push_last_move(Vertex::Pass);
        self.last_was_capture = false;
    }

    /// Plays a move (`Resign` is a pass as far as the board is
    /// concerned) and returns the number of captured stones.
    pub fn play(&mut self, color: Color, vertex: Vertex) -> usize {
        match vertex {
            Vertex::Point(i) => self.play_at(color, i),
            Vertex::Pass | Vertex::Resign => {
                self.play_pass(color);
                0
            }
        }
    }

    /// Overwrites the newest entry of the last-move buffer with the
    /// resignation marker.
    pub(crate) fn record_resign(&mut self) {
        self.push_last_move(Vertex::Resign);
        self.last_was_capture = false;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const COLUMNS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

        let star = |x: usize, y: usize| -> bool {
            let line = |c: usize| c == 3 || c == self.size / 2 || c == self.size - 4;

            self.size >= 13 && line(x) && line(y)
        };

        write!(f, "   ")?;
        for x in 0..self.size {
            write!(f, " {}", COLUMNS[x] as char)?;
        }
        writeln!(f)?;

        for y in (0..self.size).rev() {
            write!(f, "{:2} ", y + 1)?;

            let mut prev_mark = false;
            for x in 0..self.size {
                let i = self.vertex(x, y);
                let ch = match self.vertices[i] {
                    Square::Black => 'X',
                    Square::White => 'O',
                    _ if star(x, y) => '+',
                    _ => '.'
                };
                let mark = self.last_moves[0] == Vertex::Point(i);
                let sep = if mark { '(' } else if prev_mark { ')' } else { ' ' };

                write!(f, "{}{}", sep, ch)?;
                prev_mark = mark;
            }

            writeln!(f, "{} {:2}", if prev_mark { ')' } else { ' ' }, y + 1)?;
        }

        write!(f, "   ")?;
        for x in 0..self.size {
            write!(f, " {}", COLUMNS[x] as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sente_utils::rng::Rng;

    fn pt(board: &Board, x: usize, y: usize) -> Vertex {
        Vertex::from_coords(board.size(), x, y)
    }

    #[test]
    fn empty_board_hashes_match_oracle() {
        let board = Board::new(19);

        assert_eq!(board.hash(), board.calc_hash());
        assert_eq!(board.ko_hash(), board.calc_ko_hash());
    }

    #[test]
    fn incremental_hash_matches_oracle_over_random_game() {
        let mut board = Board::new(19);
        let mut rng = Rng::new(42);
        let mut color = Color::Black;

        for _ in 0..200 {
            let x = rng.uint32_max(19) as usize;
            let y = rng.uint32_max(19) as usize;
            let vertex = pt(&board, x, y);

            if board.is_legal(color, vertex) {
                board.play(color, vertex);

                assert_eq!(board.hash(), board.calc_hash());
                assert_eq!(board.ko_hash(), board.calc_ko_hash());
            }

            color = color.opposite();
        }
    }

    #[test]
    fn pass_changes_hash_but_not_ko_hash() {
        let mut board = Board::new(9);
        let before = (board.hash(), board.ko_hash());

        board.play(Color::Black, Vertex::Pass);

        assert_ne!(board.hash(), before.0);
        assert_eq!(board.ko_hash(), before.1);
        assert_eq!(board.hash(), board.calc_hash());
        assert_eq!(board.passes(), 1);
    }

    #[test]
    fn single_stone_capture() {
        let mut board = Board::new(9);

        // white stone at (1, 0) surrounded by black
        board.play(Color::White, pt(&board, 1, 0));
        board.play(Color::Black, pt(&board, 0, 0));
        board.play(Color::Black, pt(&board, 2, 0));

        let captured = board.play(Color::Black, pt(&board, 1, 1));

        assert_eq!(captured, 1);
        assert_eq!(board.at(board.vertex(1, 0)), None);
        assert_eq!(board.hash(), board.calc_hash());
        assert_eq!(board.ko_hash(), board.calc_ko_hash());
        assert!(board.last_was_capture());
    }

    #[test]
    fn group_merge_and_liberties() {
        let mut board = Board::new(9);

        board.play(Color::Black, pt(&board, 1, 1));
        board.play(Color::Black, pt(&board, 2, 1));
        board.play(Color::Black, pt(&board, 1, 2));

        let i = board.vertex(1, 1);

        assert_eq!(board.group_stones(i), 3);
        assert_eq!(board.group_liberties(i), 7);
    }

    #[test]
    fn suicide_is_detected() {
        let mut board = Board::new(9);

        // surround (0, 0) with white
        board.play(Color::White, pt(&board, 1, 0));
        board.play(Color::White, pt(&board, 0, 1));

        assert!(board.is_suicide(Color::Black, board.vertex(0, 0)));
        assert!(!board.is_suicide(Color::White, board.vertex(0, 0)));
        assert_eq!(
            board.check(Color::Black, pt(&board, 0, 0)),
            Err(MoveError::Suicide)
        );
    }

    #[test]
    fn capturing_the_last_liberty_is_not_suicide() {
        let mut board = Board::new(9);

        // white at (0, 0) in atari; black at (0, 1); playing black (1, 0)
        // captures rather than suicides
        board.play(Color::White, pt(&board, 0, 0));
        board.play(Color::Black, pt(&board, 0, 1));

        assert!(!board.is_suicide(Color::Black, board.vertex(1, 0)));

        let captured = board.play(Color::Black, pt(&board, 1, 0));

        assert_eq!(captured, 1);
    }

    #[test]
    fn ko_is_set_and_rejected() {
        let mut board = Board::new(9);

        // canonical ko shape
        board.play(Color::Black, pt(&board, 1, 2));
        board.play(Color::Black, pt(&board, 2, 3));
        board.play(Color::Black, pt(&board, 2, 1));
        board.play(Color::White, pt(&board, 4, 2));
        board.play(Color::White, pt(&board, 3, 3));
        board.play(Color::White, pt(&board, 3, 1));
        board.play(Color::White, pt(&board, 2, 2));

        // black captures the white stone at (2, 2)
        let captured = board.play(Color::Black, pt(&board, 3, 2));
        assert_eq!(captured, 1);

        // immediate recapture is simple ko
        assert_eq!(
            board.check(Color::White, pt(&board, 2, 2)),
            Err(MoveError::Ko)
        );
        assert_eq!(board.hash(), board.calc_hash());
    }

    #[test]
    fn multi_stone_capture_sets_no_ko() {
        let mut board = Board::new(9);

        board.play(Color::White, pt(&board, 0, 0));
        board.play(Color::White, pt(&board, 1, 0));
        board.play(Color::Black, pt(&board, 0, 1));
        board.play(Color::Black, pt(&board, 1, 1));

        let captured = board.play(Color::Black, pt(&board, 2, 0));

        assert_eq!(captured, 2);
        assert!(board.is_legal(Color::White, pt(&board, 0, 0)));
    }

    #[test]
    fn occupied_is_rejected() {
        let mut board = Board::new(9);

        board.play(Color::Black, pt(&board, 4, 4));

        assert_eq!(
            board.check(Color::White, pt(&board, 4, 4)),
            Err(MoveError::Occupied)
        );
    }

    #[test]
    fn pass_counter_saturates() {
        let mut board = Board::new(9);

        for _ in 0..6 {
            let color = board.to_move();
            board.play(color, Vertex::Pass);
            assert_eq!(board.hash(), board.calc_hash());
        }

        assert_eq!(board.passes(), 4);
    }

    #[test]
    fn last_move_buffer_shifts() {
        let mut board = Board::new(9);
        let a = pt(&board, 0, 0);
        let b = pt(&board, 1, 1);

        board.play(Color::Black, a);
        board.play(Color::White, b);

        assert_eq!(board.last_move(), b);
    }
}
