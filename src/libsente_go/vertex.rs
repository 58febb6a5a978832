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

//! Board addressing. Points carry the internal index of the
//! sentinel-bordered point array; `Pass` and `Resign` are the two
//! pseudo-moves.

use std::fmt;

use regex::Regex;

/// The largest supported board side.
pub const MAXBOARDSIZE: usize = 19;

/// The number of entries in the bordered point array.
pub const MAXSQ: usize = (MAXBOARDSIZE + 2) * (MAXBOARDSIZE + 2);

/// Column letters, with `I` skipped as the vertex grammar requires.
const COLUMNS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Vertex {
    Pass,
    Resign,
    Point(usize)
}

impl Vertex {
    /// Returns the bordered index of the point at the given zero-based
    /// coordinates on a board of side `size`.
    pub fn from_coords(size: usize, x: usize, y: usize) -> Vertex {
        debug_assert!(x < size && y < size);

        Vertex::Point((y + 1) * (size + 2) + (x + 1))
    }

    /// Returns the zero-based coordinates of this point on a board of
    /// side `size`, or `None` for the pseudo-moves.
    pub fn to_coords(self, size: usize) -> Option<(usize, usize)> {
        match self {
            Vertex::Point(v) => {
                let side = size + 2;

                Some((v % side - 1, v / side - 1))
            },
            _ => None
        }
    }

    /// Parses the vertex grammar: a column letter (skipping `I`) followed
    /// by a one-based row, or `pass` / `resign`.
    pub fn from_text(size: usize, text: &str) -> Option<Vertex> {
        lazy_static! {
            static ref VERTEX: Regex = Regex::new(r"^(?i)([a-hj-z])([0-9]{1,2})$").expect("could not compile vertex pattern");
        }

        match text.to_ascii_lowercase().as_str() {
            "pass" => return Some(Vertex::Pass),
            "resign" => return Some(Vertex::Resign),
            _ => {}
        }

        let caps = VERTEX.captures(text)?;
        let letter = caps[1].to_ascii_uppercase().as_bytes()[0];
        let x = COLUMNS.iter().position(|&c| c == letter)?;
        let row = caps[2].parse::<usize>().ok()?;

        if row == 0 || row > size || x >= size {
            return None;
        }

        Some(Vertex::from_coords(size, x, row - 1))
    }

    /// Renders this vertex in the grammar that `from_text` accepts.
    pub fn to_text(self, size: usize) -> String {
        match self {
            Vertex::Pass => "pass".into(),
            Vertex::Resign => "resign".into(),
            Vertex::Point(_) => {
                let (x, y) = self.to_coords(size).expect("point without coordinates");

                format!("{}{}", COLUMNS[x] as char, y + 1)
            }
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_text(MAXBOARDSIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for y in 0..19 {
            for x in 0..19 {
                let vertex = Vertex::from_coords(19, x, y);
                let text = vertex.to_text(19);

                assert_eq!(Vertex::from_text(19, &text), Some(vertex));
                assert_eq!(vertex.to_coords(19), Some((x, y)));
            }
        }
    }

    #[test]
    fn skips_i() {
        assert_eq!(Vertex::from_text(19, "J1"), Some(Vertex::from_coords(19, 8, 0)));
        assert_eq!(Vertex::from_text(19, "i1"), None);
        assert_eq!(Vertex::from_coords(19, 8, 0).to_text(19), "J1");
    }

    #[test]
    fn pseudo_moves() {
        assert_eq!(Vertex::from_text(19, "PASS"), Some(Vertex::Pass));
        assert_eq!(Vertex::from_text(19, "resign"), Some(Vertex::Resign));
    }

    #[test]
    fn out_of_range() {
        assert_eq!(Vertex::from_text(19, "A0"), None);
        assert_eq!(Vertex::from_text(19, "A20"), None);
        assert_eq!(Vertex::from_text(9, "T1"), None);
        assert_eq!(Vertex::from_text(19, "T19"), Some(Vertex::from_coords(19, 18, 18)));
    }

    #[test]
    fn corners() {
        assert_eq!(Vertex::from_text(19, "A1"), Some(Vertex::Point(22)));
        assert_eq!(Vertex::from_coords(19, 0, 0), Vertex::Point(22));
        assert_eq!(Vertex::from_coords(19, 18, 18), Vertex::Point(19 * 21 + 19));
    }
}
