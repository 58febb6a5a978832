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

//! Process-wide tunables, each parsed once from a `--flag value` command
//! line argument with an environment variable fallback.

use std::env;
use std::str::FromStr;

/// Returns the value of the given command line argument (`--name value`),
/// or of the environment variable `SENTE_NAME`, if either is present and
/// parses.
///
/// # Arguments
///
/// * `name` - the name of the argument, without the leading dashes
///
fn get_opt<T: FromStr>(name: &str) -> Option<T> {
    let mut args = env::args();

    while let Some(arg) = args.next() {
        if arg == format!("--{}", name) {
            return args.next().and_then(|value| value.parse::<T>().ok());
        }
    }

    let key = format!("SENTE_{}", name.to_uppercase().replace('-', "_"));

    env::var(&key).ok().and_then(|value| value.parse::<T>().ok())
}

/// Returns true if the given flag is present on the command line, or its
/// environment fallback is set to `1` or `true`.
fn has_opt(name: &str) -> bool {
    if env::args().any(|arg| arg == format!("--{}", name)) {
        return true;
    }

    let key = format!("SENTE_{}", name.to_uppercase().replace('-', "_"));

    match env::var(&key) {
        Ok(value) => value == "1" || value == "true",
        Err(_) => false
    }
}

lazy_static! {
    /// The number of search worker threads.
    pub static ref NUM_THREADS: usize = get_opt("num-threads")
        .unwrap_or_else(|| {
            ::std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        });

    /// The maximum number of playouts per move when no other limit applies.
    pub static ref NUM_PLAYOUTS: usize = get_opt("playouts").unwrap_or(1600);

    /// The exploration constant in the PUCT formula.
    pub static ref CPUCT: f32 = get_opt("cpuct").unwrap_or(0.8);

    /// How much an unvisited child's Q is reduced below its parent's.
    pub static ref FPU_REDUCE: f32 = get_opt("fpu-reduce").unwrap_or(0.25);

    /// How many losses a single pending traversal counts as.
    pub static ref VIRTUAL_LOSS: i32 = get_opt("virtual-loss").unwrap_or(3);

    /// The temperature of the policy softmax.
    pub static ref SOFTMAX_TEMP: f32 = get_opt("softmax-temp").unwrap_or(1.0);

    /// The seed of every random number generator in the process. Each
    /// thread further mixes in its own identity so runs are reproducible
    /// given the seed and the thread count.
    pub static ref RNG_SEED: u64 = get_opt("seed").unwrap_or(5489);

    /// Resign when the best winrate drops below this.
    pub static ref RESIGN_THRESHOLD: f32 = get_opt("resign-threshold").unwrap_or(0.05);

    /// Never resign, regardless of the winrate.
    pub static ref NO_RESIGN: bool = has_opt("no-resign");

    /// Self-play mode, which adds dirichlet noise to the root of every
    /// search tree.
    pub static ref SELF_PLAY: bool = has_opt("self-play");

    /// The fraction of the root prior that is replaced by noise in
    /// self-play mode.
    pub static ref NOISE_FRAC: f32 = get_opt("noise-frac").unwrap_or(0.25);

    /// The concentration of the root dirichlet noise.
    pub static ref DIRICHLET_ALPHA: f32 = get_opt("dirichlet-alpha").unwrap_or(0.03);

    /// The number of entries in the transposition table.
    pub static ref TT_SIZE: usize = get_opt("tt-size").unwrap_or(500_000);

    /// The path of the weights file to load at start-up.
    pub static ref WEIGHTS_PATH: String = get_opt("weights").unwrap_or_else(|| "sente.weights".into());
}
