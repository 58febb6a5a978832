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

//! Area (Tromp-Taylor) scoring. Stones count for their color, empty
//! regions count for a color iff they touch only that color.

use crate::board::{Board, Square};
use crate::color::Color;
use crate::vertex::MAXSQ;

/// Returns the score margin from black's perspective, komi deducted.
pub fn area_score(board: &Board, komi: f32) -> f32 {
    let size = board.size();
    let mut black = 0usize;
    let mut white = 0usize;
    let mut seen = [false; MAXSQ];

    for y in 0..size {
        for x in 0..size {
            let i = board.vertex(x, y);

            match board.at(i) {
                Some(Color::Black) => black += 1,
                Some(Color::White) => white += 1,
                None => {
                    if seen[i] {
                        continue;
                    }

                    let mut stack = vec![i];
                    let mut count = 0;
                    let mut touches_black = false;
                    let mut touches_white = false;

                    seen[i] = true;

                    while let Some(p) = stack.pop() {
                        count += 1;

                        for n in board.neighbors(p) {
                            match board.square(n) {
                                Square::Black => touches_black = true,
                                Square::White => touches_white = true,
                                Square::Empty => {
                                    if !seen[n] {
                                        seen[n] = true;
                                        stack.push(n);
                                    }
                                },
                                Square::Invalid => {}
                            }
                        }
                    }

                    if touches_black && !touches_white {
                        black += count;
                    } else if touches_white && !touches_black {
                        white += count;
                    }
                }
            }
        }
    }

    black as f32 - white as f32 - komi
}

/// Renders the margin in the usual `B+3.5` / `W+0.5` / `0` form.
pub fn final_score(board: &Board, komi: f32) -> String {
    let margin = area_score(board, komi);

    if margin > 0.0 {
        format!("B+{:.1}", margin)
    } else if margin < 0.0 {
        format!("W+{:.1}", -margin)
    } else {
        "0".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;

    fn pt(board: &Board, x: usize, y: usize) -> Vertex {
        Vertex::from_coords(board.size(), x, y)
    }

    #[test]
    fn empty_board_is_all_komi() {
        let board = Board::new(9);

        assert_eq!(area_score(&board, 7.5), -7.5);
        assert_eq!(final_score(&board, 7.5), "W+7.5");
    }

    #[test]
    fn lone_stone_owns_the_board() {
        let mut board = Board::new(9);

        board.play(Color::Black, pt(&board, 4, 4));

        assert_eq!(area_score(&board, 0.0), 81.0);
        assert_eq!(final_score(&board, 0.0), "B+81.0");
    }

    #[test]
    fn divided_board() {
        let mut board = Board::new(5);

        // black wall on column 1, white wall on column 3
        for y in 0..5 {
            board.play(Color::Black, pt(&board, 1, y));
            board.play(Color::White, pt(&board, 3, y));
        }

        // black: column 0 (5) + wall (5); white: column 4 (5) + wall (5);
        // the middle column touches both
        assert_eq!(area_score(&board, 0.0), 0.0);
        assert_eq!(final_score(&board, 0.0), "0");
        assert_eq!(final_score(&board, 0.5), "W+0.5");
    }
}
