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

use std::io::{stdin, stdout};
use std::path::Path;
use std::process;
use std::sync::Arc;

use log::info;

use sente_nn::Network;
use sente_utils::config;

mod gtp;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = (*config::WEIGHTS_PATH).clone();
    let network = match Network::from_file(Path::new(&path)) {
        Ok(network) => network,
        Err(reason) => {
            eprintln!("{}", reason);
            process::exit(1);
        }
    };

    info!(
        "{} channels, {} residual blocks, {} search threads",
        network.channels(),
        network.residual_blocks(),
        *config::NUM_THREADS
    );

    let mut engine = gtp::Gtp::new(Arc::new(network));
    let stdin = stdin();
    let stdout = stdout();

    if let Err(reason) = engine.run(stdin.lock(), stdout.lock()) {
        eprintln!("could not read command stream: {}", reason);
        process::exit(2);
    }
}
