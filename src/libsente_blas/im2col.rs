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

//! Unrolls a CHW image into the column matrix that turns a convolution
//! into one matrix multiplication.

use crate::{BOARD_SIZE, NUM_SQUARES};

/// Returns a `(channels * filter_size^2) x NUM_SQUARES` row-major matrix
/// whose column `s` holds the zero-padded receptive field of spatial
/// position `s`.
pub fn im2col(filter_size: usize, channels: usize, input: &[f32]) -> Vec<f32> {
    debug_assert_eq!(input.len(), channels * NUM_SQUARES);

    let filter_len = filter_size * filter_size;
    let pad = (filter_size / 2) as isize;
    let n = BOARD_SIZE as isize;
    let mut col = vec![0.0; channels * filter_len * NUM_SQUARES];

    for c in 0..channels {
        for fy in 0..filter_size {
            for fx in 0..filter_size {
                let row = (c * filter_len + fy * filter_size + fx) * NUM_SQUARES;

                for y in 0..n {
                    let sy = y + fy as isize - pad;

                    if sy < 0 || sy >= n {
                        continue;
                    }

                    for x in 0..n {
                        let sx = x + fx as isize - pad;

                        if sx < 0 || sx >= n {
                            continue;
                        }

                        col[row + (y * n + x) as usize] =
                            input[c * NUM_SQUARES + (sy * n + sx) as usize];
                    }
                }
            }
        }
    }

    col
}
