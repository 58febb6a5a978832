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

//! Dirichlet noise for the root prior, so self-play does not overfit to
//! the network's first choice.

use rand_distr::{Distribution, Gamma};

use sente_utils::rng::with_rng;

use crate::tree::Node;

/// Mixes `frac * Dir(alpha)` into the priors of the given children.
pub fn add(children: &mut [Node], alpha: f32, frac: f32) {
    if children.is_empty() {
        return;
    }

    let gamma = Gamma::new(alpha as f64, 1.0).expect("could not build gamma distribution");
    let noise: Vec<f64> = with_rng(|rng| {
        (0..children.len()).map(|_| gamma.sample(&mut *rng)).collect()
    });

    let total: f64 = noise.iter().sum();

    if total < 1e-12 {
        return;
    }

    for (child, noise) in children.iter_mut().zip(noise) {
        let mixed = (1.0 - frac) * child.prior() + frac * (noise / total) as f32;

        child.set_prior(mixed);
    }
}
