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

//! The complete ko-aware game with navigation. Every move stores a full
//! snapshot of the `KoState`, shared by reference, so undo is O(1) and
//! playing after an undo truncates the abandoned future.

use std::sync::Arc;
use std::time::Duration;

use crate::board::{Board, MoveError};
use crate::color::Color;
use crate::ko_state::KoState;
use crate::time_control::TimeControl;
use crate::vertex::Vertex;

/// Why a textual move was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextMoveError {
    Syntax,
    Illegal(MoveError)
}

impl ::std::fmt::Display for TextMoveError {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match *self {
            TextMoveError::Syntax => write!(f, "syntax error"),
            TextMoveError::Illegal(reason) => write!(f, "{}", reason)
        }
    }
}

#[derive(Clone)]
pub struct GameState {
    state: KoState,
    game_history: Vec<Arc<KoState>>,
    time_control: TimeControl,
    komi: f32,
    resigned: Option<Color>
}

impl GameState {
    pub fn new(size: usize) -> GameState {
        let state = KoState::new(size);
        let game_history = vec![Arc::new(state.clone())];

        GameState {
            state,
            game_history,
            time_control: TimeControl::new(size),
            komi: 7.5,
            resigned: None
        }
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn ko_state(&self) -> &KoState {
        &self.state
    }

    pub fn size(&self) -> usize {
        self.state.board().size()
    }

    pub fn to_move(&self) -> Color {
        self.state.board().to_move()
    }

    pub fn movenum(&self) -> usize {
        self.state.board().movenum()
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    pub fn set_komi(&mut self, komi: f32) {
        self.komi = komi;
    }

    /// The color that resigned, if any. The board records a resignation
    /// as a pass; this flag is what the protocol layer reports.
    pub fn resigned(&self) -> Option<Color> {
        self.resigned
    }

    /// Hands the turn to the given color without recording a move; the
    /// protocol layer uses this when asked to generate a move out of
    /// turn.
    pub fn set_to_move(&mut self, color: Color) {
        self.state.board_mut().set_to_move(color);
    }

    pub fn check(&self, color: Color, vertex: Vertex) -> Result<(), MoveError> {
        self.state.check(color, vertex)
    }

    pub fn is_legal(&self, color: Color, vertex: Vertex) -> bool {
        self.state.is_legal(color, vertex)
    }

    /// Plays a move and snapshots the resulting state, cutting off any
    /// leftover future from earlier navigation. A resignation plays as a
    /// pass but overwrites the last-move marker and raises the resign
    /// flag.
    pub fn play_move(&mut self, color: Color, vertex: Vertex) -> Result<usize, MoveError> {
        self.state.check(color, vertex)?;

        let captured = self.state.play(color, vertex);

        if vertex == Vertex::Resign {
            self.state.board_mut().record_resign();
            self.resigned = Some(color);
        }

        let movenum = self.state.board().movenum();

        self.game_history.truncate(movenum);
        self.game_history.push(Arc::new(self.state.clone()));
        Ok(captured)
    }

    /// Plays a move for the side to move.
    pub fn play(&mut self, vertex: Vertex) -> Result<usize, MoveError> {
        self.play_move(self.to_move(), vertex)
    }

    /// Parses and plays a textual move (`b q16`, `white pass`, ...).
    pub fn play_textmove(&mut self, color: &str, vertex: &str) -> Result<usize, TextMoveError> {
        let color = color.parse::<Color>().map_err(|_| TextMoveError::Syntax)?;
        let vertex = Vertex::from_text(self.size(), vertex).ok_or(TextMoveError::Syntax)?;

        self.play_move(color, vertex).map_err(TextMoveError::Illegal)
    }

    /// Steps one move back in the game history. Returns false at the
    /// start of the game.
    pub fn undo_move(&mut self) -> bool {
        let movenum = self.state.board().movenum();

        if movenum > 0 {
            // the snapshots stay in place so `forward_move` can redo
            self.state = (*self.game_history[movenum - 1]).clone();
            true
        } else {
            false
        }
    }

    /// Steps one move forward again after an undo. Returns false at the
    /// end of the recorded history.
    pub fn forward_move(&mut self) -> bool {
        let movenum = self.state.board().movenum();

        if self.game_history.len() > movenum + 1 {
            self.state = (*self.game_history[movenum + 1]).clone();
            true
        } else {
            false
        }
    }

    /// Rewinds to the empty-game snapshot without discarding history.
    pub fn rewind(&mut self) {
        self.state = (*self.game_history[0]).clone();
    }

    pub fn time_control(&self) -> &TimeControl {
        &self.time_control
    }

    pub fn set_time_control(&mut self, main_time: Duration, byo_time: Duration, byo_stones: usize, byo_periods: usize) {
        self.time_control.set_boardsize(self.size());
        self.time_control.set(main_time, byo_time, byo_stones, byo_periods);
    }

    pub fn adjust_time(&mut self, color: Color, time: Duration, stones: usize) {
        self.time_control.adjust(color, time, stones);
    }

    pub fn start_clock(&mut self, color: Color) {
        self.time_control.start(color);
    }

    pub fn stop_clock(&mut self, color: Color) {
        self.time_control.stop(color);
    }
}
