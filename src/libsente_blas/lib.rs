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

//! The linear-algebra operator set the evaluator runs on, with two
//! interchangeable implementations: `Cpu`, the production path built on
//! im2col plus a sgemm kernel, and `Reference`, a naive double-precision
//! oracle the production path is tested against.

mod im2col;

pub use self::im2col::im2col;

/// The spatial side of every tensor the network sees.
pub const BOARD_SIZE: usize = 19;

/// The spatial size of one channel.
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// The batch-norm variance epsilon the weights are trained against.
pub const EPSILON: f32 = 1e-5;

/// The operator set of the forward pass. Shapes follow the weights file:
/// convolution weights are `[out, in, f, f]` row-major, fully-connected
/// weights `[out, in]` row-major, and all spatial tensors are CHW over a
/// `19 x 19` board with zero padding preserving the spatial size.
pub trait Kernels {
    /// `output[co] = sum_c input[c] * weights[co][c] + biases[co]`, with
    /// a `filter_size` of 1 or 3.
    fn convolve(
        &self,
        filter_size: usize,
        channels_in: usize,
        channels_out: usize,
        input: &[f32],
        weights: &[f32],
        biases: &[f32],
        output: &mut [f32]
    );

    /// `output = relu((input - mean) / sqrt(variance + eps) + residual)`,
    /// with the optional residual added before the rectifier. There is no
    /// learned affine.
    fn batchnorm_relu(
        &self,
        channels: usize,
        input: &[f32],
        means: &[f32],
        variances: &[f32],
        residual: Option<&[f32]>,
        output: &mut [f32]
    );

    /// `output = weights * input + biases`, optionally rectified.
    fn fc(
        &self,
        inputs: usize,
        outputs: usize,
        input: &[f32],
        weights: &[f32],
        biases: &[f32],
        relu: bool,
        output: &mut [f32]
    );
}

/// The production implementation.
#[derive(Clone, Default)]
pub struct Cpu;

impl Kernels for Cpu {
    fn convolve(
        &self,
        filter_size: usize,
        channels_in: usize,
        channels_out: usize,
        input: &[f32],
        weights: &[f32],
        biases: &[f32],
        output: &mut [f32]
    ) {
        debug_assert!(filter_size == 1 || filter_size == 3);
        debug_assert_eq!(input.len(), channels_in * NUM_SQUARES);
        debug_assert_eq!(output.len(), channels_out * NUM_SQUARES);

        let filter_dim = filter_size * filter_size * channels_in;
        debug_assert_eq!(weights.len(), channels_out * filter_dim);
        debug_assert_eq!(biases.len(), channels_out);

        let col_storage;
        let col: &[f32] = if filter_size == 1 {
            input
        } else {
            col_storage = im2col(filter_size, channels_in, input);
            &col_storage
        };

        unsafe {
            matrixmultiply::sgemm(
                channels_out, filter_dim, NUM_SQUARES,
                1.0,
                weights.as_ptr(), filter_dim as isize, 1,
                col.as_ptr(), NUM_SQUARES as isize, 1,
                0.0,
                output.as_mut_ptr(), NUM_SQUARES as isize, 1
            );
        }

        for co in 0..channels_out {
            let bias = biases[co];

            for value in &mut output[co * NUM_SQUARES..(co + 1) * NUM_SQUARES] {
                *value += bias;
            }
        }
    }

    fn batchnorm_relu(
        &self,
        channels: usize,
        input: &[f32],
        means: &[f32],
        variances: &[f32],
        residual: Option<&[f32]>,
        output: &mut [f32]
    ) {
        debug_assert_eq!(input.len(), channels * NUM_SQUARES);
        debug_assert_eq!(output.len(), channels * NUM_SQUARES);

        for c in 0..channels {
            let mean = means[c];
            let scale = (variances[c] + EPSILON).sqrt().recip();

            for i in 0..NUM_SQUARES {
                let index = c * NUM_SQUARES + i;
                let mut value = scale * (input[index] - mean);

                if let Some(residual) = residual {
                    value += residual[index];
                }

                output[index] = if value > 0.0 { value } else { 0.0 };
            }
        }
    }

    fn fc(
        &self,
        inputs: usize,
        outputs: usize,
        input: &[f32],
        weights: &[f32],
        biases: &[f32],
        relu: bool,
        output: &mut [f32]
    ) {
        debug_assert_eq!(input.len(), inputs);
        debug_assert_eq!(weights.len(), outputs * inputs);
        debug_assert_eq!(output.len(), outputs);

        unsafe {
            matrixmultiply::sgemm(
                outputs, inputs, 1,
                1.0,
                weights.as_ptr(), inputs as isize, 1,
                input.as_ptr(), 1, 1,
                0.0,
                output.as_mut_ptr(), 1, 1
            );
        }

        for o in 0..outputs {
            let mut value = output[o] + biases[o];

            if relu && value < 0.0 {
                value = 0.0;
            }

            output[o] = value;
        }
    }
}

/// The double-precision oracle. Same contract, naive loops, rounding to
/// single precision only when writing the output.
#[derive(Clone, Default)]
pub struct Reference;

impl Kernels for Reference {
    fn convolve(
        &self,
        filter_size: usize,
        channels_in: usize,
        channels_out: usize,
        input: &[f32],
        weights: &[f32],
        biases: &[f32],
        output: &mut [f32]
    ) {
        let pad = (filter_size / 2) as isize;
        let n = BOARD_SIZE as isize;

        for co in 0..channels_out {
            for y in 0..n {
                for x in 0..n {
                    let mut acc = biases[co] as f64;

                    for c in 0..channels_in {
                        for fy in 0..filter_size as isize {
                            for fx in 0..filter_size as isize {
                                let sy = y + fy - pad;
                                let sx = x + fx - pad;

                                if sy < 0 || sy >= n || sx < 0 || sx >= n {
                                    continue;
                                }

                                let w = weights[
                                    ((co * channels_in + c) * filter_size + fy as usize)
                                        * filter_size + fx as usize
                                ];
                                let v = input[c * NUM_SQUARES + (sy * n + sx) as usize];

                                acc += (w as f64) * (v as f64);
                            }
                        }
                    }

                    output[co * NUM_SQUARES + (y * n + x) as usize] = acc as f32;
                }
            }
        }
    }

    fn batchnorm_relu(
        &self,
        channels: usize,
        input: &[f32],
        means: &[f32],
        variances: &[f32],
        residual: Option<&[f32]>,
        output: &mut [f32]
    ) {
        for c in 0..channels {
            let mean = means[c] as f64;
            let scale = 1.0 / ((variances[c] as f64) + EPSILON as f64).sqrt();

            for i in 0..NUM_SQUARES {
                let index = c * NUM_SQUARES + i;
                let mut value = scale * ((input[index] as f64) - mean);

                if let Some(residual) = residual {
                    value += residual[index] as f64;
                }

                output[index] = if value > 0.0 { value as f32 } else { 0.0 };
            }
        }
    }

    fn fc(
        &self,
        inputs: usize,
        outputs: usize,
        input: &[f32],
        weights: &[f32],
        biases: &[f32],
        relu: bool,
        output: &mut [f32]
    ) {
        for o in 0..outputs {
            let mut acc = biases[o] as f64;

            for i in 0..inputs {
                acc += (weights[o * inputs + i] as f64) * (input[i] as f64);
            }

            if relu && acc < 0.0 {
                acc = 0.0;
            }

            output[o] = acc as f32;
        }
    }
}
