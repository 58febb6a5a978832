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

//! The eight dihedral symmetries of the board, as permutations of the
//! packed `N×N` indices the neural network sees.

use crate::vertex::MAXBOARDSIZE;

const N: usize = MAXBOARDSIZE;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transform {
    Identity,
    FlipUp,
    FlipLeft,
    Rot180,
    Transpose,
    Rot90,
    Rot270,
    TransposeAnti
}

pub const ALL: [Transform; 8] = [
    Transform::Identity,
    Transform::FlipUp,
    Transform::FlipLeft,
    Transform::Rot180,
    Transform::Transpose,
    Transform::Rot90,
    Transform::Rot270,
    Transform::TransposeAnti
];

impl Transform {
    pub fn from_index(index: usize) -> Transform {
        ALL[index]
    }

    pub fn to_index(self) -> usize {
        ALL.iter().position(|&t| t == self).expect("transform not in ALL")
    }

    /// Applies this symmetry to a packed index in `0..N*N`.
    pub fn apply(self, index: usize) -> usize {
        debug_assert!(index < N * N);

        let (mut x, mut y) = (index % N, index / N);

        let flips = match self {
            Transform::Identity => 0,
            Transform::FlipUp => 1,
            Transform::FlipLeft => 2,
            Transform::Rot180 => 3,
            Transform::Transpose |
            Transform::Rot90 |
            Transform::Rot270 |
            Transform::TransposeAnti => {
                ::std::mem::swap(&mut x, &mut y);
                self.to_index() - 4
            }
        };

        let new_x = if flips & 2 != 0 { N - x - 1 } else { x };
        let new_y = if flips & 1 != 0 { N - y - 1 } else { y };

        new_y * N + new_x
    }

    /// The symmetry that undoes this one. The two quarter rotations are
    /// each other's inverses, everything else is an involution.
    pub fn inverse(self) -> Transform {
        match self {
            Transform::Rot90 => Transform::Rot270,
            Transform::Rot270 => Transform::Rot90,
            other => other
        }
    }
}
