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

//! Per-color game clocks and the per-move time allocation used by the
//! search driver.

use std::time::{Duration, Instant};

use crate::color::Color;

/// Kept back from every allocation so the engine never flags on the
/// margin of a `genmove` round-trip.
const SAFETY_MARGIN: Duration = Duration::from_millis(100);

/// No allocation is ever shorter than this.
const MIN_ALLOCATION: Duration = Duration::from_millis(100);

#[derive(Clone, Debug)]
pub struct TimeControl {
    boardsize: usize,
    main_time: Duration,
    byo_time: Duration,
    byo_stones: usize,
    byo_periods: usize,

    remaining: [Duration; 2],
    stones_left: [usize; 2],
    in_byo: [bool; 2],
    started: [Option<Instant>; 2]
}

fn index(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1
    }
}

impl TimeControl {
    pub fn new(boardsize: usize) -> TimeControl {
        let mut out = TimeControl {
            boardsize,
            main_time: Duration::from_secs(60 * 60),
            byo_time: Duration::from_secs(0),
            byo_stones: 0,
            byo_periods: 0,
            remaining: [Duration::from_secs(0); 2],
            stones_left: [0; 2],
            in_byo: [false; 2],
            started: [None; 2]
        };

        out.reset_clocks();
        out
    }

    pub fn set_boardsize(&mut self, boardsize: usize) {
        self.boardsize = boardsize;
    }

    /// Installs new settings and resets both clocks.
    pub fn set(&mut self, main_time: Duration, byo_time: Duration, byo_stones: usize, byo_periods: usize) {
        self.main_time = main_time;
        self.byo_time = byo_time;
        self.byo_stones = byo_stones;
        self.byo_periods = byo_periods;
        self.reset_clocks();
    }

    pub fn reset_clocks(&mut self) {
        self.remaining = [self.main_time; 2];
        self.stones_left = [self.byo_stones; 2];
        self.in_byo = [false; 2];
        self.started = [None; 2];
    }

    pub fn start(&mut self, color: Color) {
        self.started[index(color)] = Some(Instant::now());
    }

    /// Stops the given color's clock and subtracts the elapsed time.
    pub fn stop(&mut self, color: Color) {
        let i = index(color);

        if let Some(started) = self.started[i].take() {
            let elapsed = started.elapsed();

            self.remaining[i] = self.remaining[i].saturating_sub(elapsed);
        }
    }

    /// Installs an absolute reading reported by the controller
    /// (`time_left`). A non-zero stone count means the color is in
    /// byo-yomi with that many stones left in the period.
    pub fn adjust(&mut self, color: Color, time: Duration, stones: usize) {
        let i = index(color);

        if stones == 0 {
            self.remaining[i] = time;
            self.in_byo[i] = false;
        } else {
            self.remaining[i] = time;
            self.stones_left[i] = stones;
            self.in_byo[i] = true;
        }
    }

    pub fn remaining(&self, color: Color) -> Duration {
        self.remaining[index(color)]
    }

    pub fn main_time(&self) -> Duration {
        self.main_time
    }

    pub fn byo_time(&self) -> Duration {
        self.byo_time
    }

    pub fn byo_stones(&self) -> usize {
        self.byo_stones
    }

    pub fn byo_periods(&self) -> usize {
        self.byo_periods
    }

    /// How long the next move may think: `main / moves_left` plus the
    /// per-stone byo-yomi allowance, where the moves-left estimate is the
    /// board side.
    pub fn max_time_for_move(&self, color: Color) -> Duration {
        let i = index(color);
        let moves_left = self.boardsize.max(1) as u32;

        if self.in_byo[i] {
            let stones = self.stones_left[i].max(1) as u32;

            return (self.remaining[i] / stones).max(MIN_ALLOCATION);
        }

        let main = self.remaining[i].saturating_sub(SAFETY_MARGIN);
        let mut allocation = main / moves_left;

        if self.byo_stones > 0 {
            allocation += self.byo_time / self.byo_stones as u32;
        }

        allocation.max(MIN_ALLOCATION)
    }
}
