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

//! The forward pass, expressed purely in terms of the `sente_blas`
//! operator set. The graph owns the parsed layers and hands out scratch
//! workspaces so no buffer is allocated per evaluation.

use sente_blas::{Cpu, Kernels, NUM_SQUARES};
use sente_go::features::{FEATURE_SIZE, NUM_FEATURES};

use crate::loader::{Weights, NUM_ACTIONS};

pub struct Graph {
    weights: Weights,
    kernels: Box<dyn Kernels + Send + Sync>
}

/// Scratch buffers for one forward pass.
pub struct Workspace {
    x: Vec<f32>,
    y: Vec<f32>,
    t1: Vec<f32>,
    t2: Vec<f32>,

    policy_1: Vec<f32>,
    policy_2: Vec<f32>,
    logits: Vec<f32>,

    value_1: Vec<f32>,
    value_2: Vec<f32>,
    value_3: Vec<f32>,
    value_4: Vec<f32>
}

impl Graph {
    pub fn new(weights: Weights) -> Graph {
        Graph::with_kernels(weights, Box::new(Cpu))
    }

    pub fn with_kernels(weights: Weights, kernels: Box<dyn Kernels + Send + Sync>) -> Graph {
        Graph { weights, kernels }
    }

    pub fn channels(&self) -> usize {
        self.weights.channels
    }

    pub fn residual_blocks(&self) -> usize {
        self.weights.residual_blocks
    }

    pub fn workspace(&self) -> Workspace {
        let spatial = self.weights.channels * NUM_SQUARES;

        Workspace {
            x: vec![0.0; spatial],
            y: vec![0.0; spatial],
            t1: vec![0.0; spatial],
            t2: vec![0.0; spatial],
            policy_1: vec![0.0; 2 * NUM_SQUARES],
            policy_2: vec![0.0; 2 * NUM_SQUARES],
            logits: vec![0.0; NUM_ACTIONS],
            value_1: vec![0.0; NUM_SQUARES],
            value_2: vec![0.0; NUM_SQUARES],
            value_3: vec![0.0; 256],
            value_4: vec![0.0; 1]
        }
    }

    /// Runs the network over one set of input planes, returning the raw
    /// policy logits and the raw value-head output (before softmax and
    /// the tanh squash).
    pub fn forward(&self, ws: &mut Workspace, planes: &[f32]) -> (Vec<f32>, f32) {
        debug_assert_eq!(planes.len(), FEATURE_SIZE);

        let k = self.kernels.as_ref();
        let c = self.weights.channels;

        // input block
        let input = &self.weights.tower[0];
        k.convolve(3, NUM_FEATURES, c, planes, &input.weights, &input.biases, &mut ws.t1);
        k.batchnorm_relu(c, &ws.t1, &input.means, &input.variances, None, &mut ws.x);

        // residual tower
        for block in 0..self.weights.residual_blocks {
            let first = &self.weights.tower[1 + 2 * block];
            let second = &self.weights.tower[2 + 2 * block];

            k.convolve(3, c, c, &ws.x, &first.weights, &first.biases, &mut ws.t1);
            k.batchnorm_relu(c, &ws.t1, &first.means, &first.variances, None, &mut ws.t2);
            k.convolve(3, c, c, &ws.t2, &second.weights, &second.biases, &mut ws.t1);
            k.batchnorm_relu(c, &ws.t1, &second.means, &second.variances, Some(&ws.x), &mut ws.y);

            ::std::mem::swap(&mut ws.x, &mut ws.y);
        }

        // policy head
        let pc = &self.weights.policy_conv;
        k.convolve(1, c, 2, &ws.x, &pc.weights, &pc.biases, &mut ws.policy_1);
        k.batchnorm_relu(2, &ws.policy_1, &pc.means, &pc.variances, None, &mut ws.policy_2);
        k.fc(
            2 * NUM_SQUARES, NUM_ACTIONS,
            &ws.policy_2, &self.weights.policy_fc.weights, &self.weights.policy_fc.biases,
            false, &mut ws.logits
        );

        // value head
        let vc = &self.weights.value_conv;
        k.convolve(1, c, 1, &ws.x, &vc.weights, &vc.biases, &mut ws.value_1);
        k.batchnorm_relu(1, &ws.value_1, &vc.means, &vc.variances, None, &mut ws.value_2);
        k.fc(
            NUM_SQUARES, 256,
            &ws.value_2, &self.weights.value_fc1.weights, &self.weights.value_fc1.biases,
            true, &mut ws.value_3
        );
        k.fc(
            256, 1,
            &ws.value_3, &self.weights.value_fc2.weights, &self.weights.value_fc2.biases,
            false, &mut ws.value_4
        );

        (ws.logits.clone(), ws.value_4[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::test_utils;

    #[test]
    fn zero_network_is_all_zero() {
        let graph = Graph::new(test_utils::weights(4, 1, "0"));
        let mut ws = graph.workspace();
        let planes = vec![1.0; FEATURE_SIZE];

        let (logits, value) = graph.forward(&mut ws, &planes);

        assert_eq!(value, 0.0);
        assert!(logits.iter().all(|&l| l == 0.0));
        assert_eq!(logits.len(), NUM_ACTIONS);
    }

    #[test]
    fn forward_is_deterministic() {
        let graph = Graph::new(test_utils::weights(4, 2, "0"));
        let mut ws = graph.workspace();
        let planes = (0..FEATURE_SIZE).map(|i| (i % 2) as f32).collect::<Vec<_>>();

        let a = graph.forward(&mut ws, &planes);
        let b = graph.forward(&mut ws, &planes);

        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }
}
