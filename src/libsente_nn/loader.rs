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

//! The line-oriented weights file. Line 0 is the format version, then
//! four lines per plain convolution layer in the order {weights, biases,
//! batch-norm means, batch-norm variances}: one input layer, two per
//! residual block, and finally the fourteen head lines. The residual
//! depth is inferred from the line count, the channel width from the
//! first bias line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use sente_go::features::NUM_FEATURES;
use crate::error::Error;

/// Number of squares of the fixed-size board the network sees.
const NUM_SQUARES: usize = 361;

/// Policy outputs: every square plus the pass move.
pub const NUM_ACTIONS: usize = NUM_SQUARES + 1;

const FORMAT_VERSION: &str = "1";

/// The fixed head lines after the tower.
const NUM_HEAD_LINES: usize = 14;

#[derive(Clone)]
pub struct ConvLayer {
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
    pub means: Vec<f32>,
    pub variances: Vec<f32>
}

#[derive(Clone)]
pub struct FcLayer {
    pub weights: Vec<f32>,
    pub biases: Vec<f32>
}

#[derive(Clone)]
pub struct Weights {
    pub channels: usize,
    pub residual_blocks: usize,

    /// The input layer followed by two layers per residual block.
    pub tower: Vec<ConvLayer>,

    pub policy_conv: ConvLayer,
    pub policy_fc: FcLayer,
    pub value_conv: ConvLayer,
    pub value_fc1: FcLayer,
    pub value_fc2: FcLayer
}

fn parse_line(line_number: usize, line: &str) -> Result<Vec<f32>, Error> {
    line.split_whitespace()
        .map(|token| token.parse::<f32>().map_err(|_| Error::MalformedLine(line_number)))
        .collect()
}

fn check_shape(line: usize, values: Vec<f32>, expected: usize) -> Result<Vec<f32>, Error> {
    if values.len() != expected {
        Err(Error::WrongShape { line, expected, found: values.len() })
    } else {
        Ok(values)
    }
}

struct Lines {
    rows: Vec<Vec<f32>>,
    cursor: usize
}

impl Lines {
    fn next(&mut self) -> Vec<f32> {
        let row = ::std::mem::replace(&mut self.rows[self.cursor], vec![]);

        self.cursor += 1;
        row
    }

    /// The one-based file line of the row `next` will return.
    fn line_number(&self) -> usize {
        self.cursor + 2
    }
}

fn conv_layer(lines: &mut Lines, channels_in: usize, channels_out: usize, filter_size: usize) -> Result<ConvLayer, Error> {
    let base = lines.line_number();
    let weights = check_shape(base, lines.next(), channels_out * channels_in * filter_size * filter_size)?;
    let biases = check_shape(base + 1, lines.next(), channels_out)?;
    let means = check_shape(base + 2, lines.next(), channels_out)?;
    let variances = check_shape(base + 3, lines.next(), channels_out)?;

    Ok(ConvLayer { weights, biases, means, variances })
}

fn fc_layer(lines: &mut Lines, inputs: usize, outputs: usize) -> Result<FcLayer, Error> {
    let base = lines.line_number();
    let weights = check_shape(base, lines.next(), outputs * inputs)?;
    let biases = check_shape(base + 1, lines.next(), outputs)?;

    Ok(FcLayer { weights, biases })
}

/// Parses an already-open weights file.
pub fn parse<R: BufRead>(reader: R) -> Result<Weights, Error> {
    let mut lines = reader.lines();
    let version = match lines.next() {
        Some(line) => line?,
        None => return Err(Error::WrongLineCount(0))
    };

    if version.trim() != FORMAT_VERSION {
        return Err(Error::WrongVersion(version.trim().into()));
    }

    let mut rows = Vec::with_capacity(64);

    for (index, line) in lines.enumerate() {
        rows.push(parse_line(index + 2, &line?)?);
    }

    // one input layer (4 lines), the head (14 lines), and eight lines per
    // residual block must account for everything
    let count = rows.len();

    if count < 4 + NUM_HEAD_LINES || (count - 4 - NUM_HEAD_LINES) % 8 != 0 {
        return Err(Error::WrongLineCount(count + 1));
    }

    let residual_blocks = (count - 4 - NUM_HEAD_LINES) / 8;
    let channels = rows[1].len();

    if channels == 0 {
        return Err(Error::WrongShape { line: 3, expected: 1, found: 0 });
    }

    let mut lines = Lines { rows, cursor: 0 };
    let mut tower = Vec::with_capacity(1 + 2 * residual_blocks);

    tower.push(conv_layer(&mut lines, NUM_FEATURES, channels, 3)?);

    for _ in 0..(2 * residual_blocks) {
        tower.push(conv_layer(&mut lines, channels, channels, 3)?);
    }

    let policy_conv = conv_layer(&mut lines, channels, 2, 1)?;
    let policy_fc = fc_layer(&mut lines, 2 * NUM_SQUARES, NUM_ACTIONS)?;
    let value_conv = conv_layer(&mut lines, channels, 1, 1)?;
    let value_fc1 = fc_layer(&mut lines, NUM_SQUARES, 256)?;
    let value_fc2 = fc_layer(&mut lines, 256, 1)?;

    info!(
        "loaded weights: v{}, {} channels, {} residual blocks",
        FORMAT_VERSION, channels, residual_blocks
    );

    Ok(Weights {
        channels,
        residual_blocks,
        tower,
        policy_conv,
        policy_fc,
        value_conv,
        value_fc1,
        value_fc2
    })
}

/// Loads and parses the weights file at the given path.
pub fn load(path: &Path) -> Result<Weights, Error> {
    let file = File::open(path)?;

    parse(BufReader::new(file))
}
