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

//! Evaluator scenarios against a generated weights file.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use sente_go::features::NUM_FEATURES;
use sente_go::symmetry::{Transform, ALL};
use sente_go::GameState;
use sente_nn::{Ensemble, Network};

/// Writes a consistent version-1 weights file with the given tower shape
/// and returns its path.
fn write_weights_file(name: &str, channels: usize, residual_blocks: usize, value: &str) -> PathBuf {
    let row = |n: usize| {
        let mut out = String::with_capacity(2 * n);
        for _ in 0..n {
            out.push_str(value);
            out.push(' ');
        }
        out.push('\n');
        out
    };
    let conv = |ci: usize, co: usize, f: usize| {
        format!("{}{}{}{}", row(co * ci * f * f), row(co), row(co), row(co))
    };
    let fc = |i: usize, o: usize| format!("{}{}", row(o * i), row(o));

    let mut text = String::from("1\n");
    text += &conv(NUM_FEATURES, channels, 3);
    for _ in 0..residual_blocks {
        text += &conv(channels, channels, 3);
        text += &conv(channels, channels, 3);
    }
    text += &conv(channels, 2, 1);
    text += &fc(2 * 361, 362);
    text += &conv(channels, 1, 1);
    text += &fc(361, 256);
    text += &fc(256, 1);

    let path = ::std::env::temp_dir().join(name);
    let mut file = File::create(&path).expect("could not create weights file");

    file.write_all(text.as_bytes()).expect("could not write weights file");
    path
}

#[test]
fn loads_a_file_from_disk() {
    let path = write_weights_file("sente_tests_load.weights", 4, 2, "0.0625");
    let network = Network::from_file(&path).expect("could not load weights");

    assert_eq!(network.channels(), 4);
    assert_eq!(network.residual_blocks(), 2);
}

#[test]
fn truncated_file_is_refused() {
    let path = write_weights_file("sente_tests_bad.weights", 4, 1, "0.0625");
    let text = ::std::fs::read_to_string(&path).expect("could not re-read weights");
    let truncated = text.lines().take(10).collect::<Vec<_>>().join("\n");

    ::std::fs::write(&path, truncated).expect("could not truncate weights");
    assert!(Network::from_file(&path).is_err());
}

/// On a symmetric position every `DIRECT(r)` evaluation must agree.
#[test]
fn rotation_ensemble_invariance_on_the_empty_board() {
    let path = write_weights_file("sente_tests_rot.weights", 4, 1, "0.03125");
    let network = Network::from_file(&path).expect("could not load weights");
    let mut state = GameState::new(19);

    let mut values = vec![];

    for rotation in 0..8 {
        let (moves, winrate) = network
            .get_scored_moves(&mut state, Ensemble::Direct(rotation))
            .expect("missing evaluation");

        assert_eq!(moves.len(), 362);
        values.push(winrate);
    }

    for &value in &values[1..] {
        assert!(
            (value - values[0]).abs() <= 5e-3,
            "rotation ensemble diverges: {:?}", values
        );
    }
}

/// The policy of a rotated position is the rotated policy, so rotating
/// the input and un-rotating the output must be lossless.
#[test]
fn symmetry_round_trip_is_lossless() {
    for &t in &ALL {
        for index in 0..361 {
            assert_eq!(t.inverse().apply(t.apply(index)), index);
        }
    }

    assert_eq!(Transform::Rot90.inverse(), Transform::Rot270);
}
