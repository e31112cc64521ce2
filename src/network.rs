//! The network: an ordered stack of dense layers, plus the batched forward and
//! backward engines.
//!
//! Both engines work on caller-owned buffers ([`BatchScratch`], [`Deltas`])
//! allocated once and reused across mini-batches. A batch smaller than the
//! scratch capacity (the ragged last batch of an epoch) passes a live `rows`
//! count; buffers are never reallocated per batch.

use crate::{Layer, Loss};

#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
}

/// Reusable per-layer forward buffers for batches of up to `max_rows` samples.
///
/// For every layer `l`, `zs[l]` holds the pre-activation and `outs[l]` the
/// post-activation values, each shaped `(rows, out_dim)` row-major. The last
/// layer's `outs` is the network's prediction.
#[derive(Debug, Clone)]
pub struct BatchScratch {
    max_rows: usize,
    zs: Vec<Vec<f64>>,
    outs: Vec<Vec<f64>>,
}

/// Reusable per-layer error-signal buffers for one sample.
///
/// `deltas[l][j]` is `d(loss)/d(z_l[j])` for the sample currently being
/// processed by the backward engine.
#[derive(Debug, Clone)]
pub struct Deltas {
    per_layer: Vec<Vec<f64>>,
}

impl Network {
    /// Build a network from pre-constructed layers.
    ///
    /// Panics if the layer stack is empty or adjacent dimensions do not chain
    /// (`layers[i].in_dim == layers[i-1].out_dim`); both are programmer errors,
    /// [`crate::NetworkBuilder`] constructs valid stacks by design.
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        assert!(!layers.is_empty(), "network must have at least one layer");
        for i in 1..layers.len() {
            assert_eq!(
                layers[i].in_dim(),
                layers[i - 1].out_dim(),
                "layer {i} in_dim {} does not match previous out_dim {}",
                layers[i].in_dim(),
                layers[i - 1].out_dim()
            );
        }
        Self { layers }
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.layers
            .first()
            .expect("network must have at least one layer")
            .in_dim()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layers
            .last()
            .expect("network must have at least one layer")
            .out_dim()
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    #[inline]
    pub fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer> {
        self.layers.get_mut(idx)
    }

    /// Allocate forward buffers for batches of up to `max_rows` samples.
    pub fn batch_scratch(&self, max_rows: usize) -> BatchScratch {
        BatchScratch::new(self, max_rows)
    }

    /// Allocate per-sample delta buffers.
    pub fn deltas(&self) -> Deltas {
        Deltas::new(self)
    }

    /// Forward pass for a batch of `rows` samples.
    ///
    /// `input` is `(rows, input_dim)` row-major. Writes every layer's `z` and
    /// `out` into `scratch`; `scratch.output(rows)` is the prediction.
    ///
    /// Shape contract (programmer error to violate):
    /// - `input.len() >= rows * self.input_dim()`
    /// - `scratch` was built for this network with `max_rows >= rows`
    pub fn forward_batch(&self, input: &[f64], rows: usize, scratch: &mut BatchScratch) {
        assert!(
            rows <= scratch.max_rows,
            "batch rows {rows} exceed scratch capacity {}",
            scratch.max_rows
        );
        assert_eq!(
            scratch.zs.len(),
            self.layers.len(),
            "scratch has {} layers, network has {}",
            scratch.zs.len(),
            self.layers.len()
        );
        assert!(
            input.len() >= rows * self.input_dim(),
            "input len {} is short of rows * input_dim ({rows} * {})",
            input.len(),
            self.input_dim()
        );

        for (idx, layer) in self.layers.iter().enumerate() {
            if idx == 0 {
                layer.forward_batch(input, rows, &mut scratch.zs[0], &mut scratch.outs[0]);
            } else {
                // Borrow the previous output immutably and the current one mutably.
                let (left, right) = scratch.outs.split_at_mut(idx);
                layer.forward_batch(&left[idx - 1], rows, &mut scratch.zs[idx], &mut right[0]);
            }
        }
    }

    /// Backward pass over a batch: back-propagates error signals and applies
    /// the gradient-descent update `param -= lr * gradient` in place.
    ///
    /// `scratch` must hold the forward results of the same `input` and `rows`.
    /// `targets` is `(rows, output_dim)` row-major.
    ///
    /// Samples are processed one at a time, each in two strict phases:
    /// 1. deltas for *all* layers, output to input, reading only un-updated
    ///    weights;
    /// 2. the parameter update for all layers.
    /// No layer's weights are read for delta computation after they have been
    /// written for the current sample.
    pub fn backward_batch(
        &mut self,
        input: &[f64],
        targets: &[f64],
        rows: usize,
        loss: Loss,
        scratch: &BatchScratch,
        deltas: &mut Deltas,
        lr: f64,
    ) {
        assert!(
            lr.is_finite() && lr > 0.0,
            "learning rate must be finite and > 0"
        );
        assert!(
            rows <= scratch.max_rows,
            "batch rows {rows} exceed scratch capacity {}",
            scratch.max_rows
        );
        assert_eq!(
            deltas.per_layer.len(),
            self.layers.len(),
            "deltas has {} layers, network has {}",
            deltas.per_layer.len(),
            self.layers.len()
        );
        assert!(
            targets.len() >= rows * self.output_dim(),
            "targets len {} is short of rows * output_dim ({rows} * {})",
            targets.len(),
            self.output_dim()
        );
        assert!(
            input.len() >= rows * self.input_dim(),
            "input len {} is short of rows * input_dim ({rows} * {})",
            input.len(),
            self.input_dim()
        );

        let last = self.layers.len() - 1;
        let out_dim = self.output_dim();
        let in_dim = self.input_dim();

        for sample in 0..rows {
            // Phase 1: deltas for every layer, output to input. Weights are
            // only read here.
            for l in (0..=last).rev() {
                let layer = &self.layers[l];
                let od = layer.out_dim();
                let z_row = &scratch.zs[l][sample * od..(sample + 1) * od];

                if l == last {
                    let y_row = &scratch.outs[l][sample * od..(sample + 1) * od];
                    let t_row = &targets[sample * out_dim..(sample + 1) * out_dim];
                    let delta = &mut deltas.per_layer[l];
                    for j in 0..od {
                        delta[j] = loss.d_output(t_row[j], y_row[j]) * layer.activation().derivative(z_row[j]);
                    }
                } else {
                    let next = &self.layers[l + 1];
                    let w_next = next.weights();
                    let od_next = next.out_dim();
                    let (cur, rest) = deltas.per_layer.split_at_mut(l + 1);
                    let delta = &mut cur[l];
                    let delta_next = &rest[0];
                    for j in 0..od {
                        let mut sum = 0.0_f64;
                        for k in 0..od_next {
                            sum = delta_next[k].mul_add(w_next[j * od_next + k], sum);
                        }
                        delta[j] = sum * layer.activation().derivative(z_row[j]);
                    }
                }
            }

            // Phase 2: parameter update. Deltas for every layer are fixed, so
            // update order no longer matters.
            for l in 0..=last {
                let prev_row: &[f64] = if l == 0 {
                    &input[sample * in_dim..(sample + 1) * in_dim]
                } else {
                    let pd = self.layers[l - 1].out_dim();
                    &scratch.outs[l - 1][sample * pd..(sample + 1) * pd]
                };
                let delta = &deltas.per_layer[l];
                let layer = &mut self.layers[l];
                let od = layer.out_dim();
                let id = layer.in_dim();

                let weights = layer.weights_mut();
                for i in 0..id {
                    let prev = prev_row[i];
                    let row = i * od;
                    for j in 0..od {
                        weights[row + j] -= lr * delta[j] * prev;
                    }
                }
                let biases = layer.biases_mut();
                for j in 0..od {
                    biases[j] -= lr * delta[j];
                }
            }
        }
    }
}

impl BatchScratch {
    pub fn new(network: &Network, max_rows: usize) -> Self {
        assert!(max_rows > 0, "scratch requires max_rows > 0");
        let mut zs = Vec::with_capacity(network.layers.len());
        let mut outs = Vec::with_capacity(network.layers.len());
        for layer in &network.layers {
            zs.push(vec![0.0; max_rows * layer.out_dim()]);
            outs.push(vec![0.0; max_rows * layer.out_dim()]);
        }
        Self { max_rows, zs, outs }
    }

    #[inline]
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Pre-activation matrix of layer `l` from the most recent forward pass.
    #[inline]
    pub fn z(&self, l: usize) -> &[f64] {
        &self.zs[l]
    }

    /// Post-activation matrix of layer `l` from the most recent forward pass.
    #[inline]
    pub fn out(&self, l: usize) -> &[f64] {
        &self.outs[l]
    }

    /// The prediction of the most recent forward pass: the last layer's first
    /// `rows` output rows.
    #[inline]
    pub fn output(&self, rows: usize) -> &[f64] {
        let last = self
            .outs
            .last()
            .expect("scratch must have at least one layer");
        let out_dim = last.len() / self.max_rows;
        &last[..rows * out_dim]
    }
}

impl Deltas {
    pub fn new(network: &Network) -> Self {
        let per_layer = network
            .layers
            .iter()
            .map(|l| vec![0.0; l.out_dim()])
            .collect();
        Self { per_layer }
    }

    /// Delta vector of layer `l` for the most recently processed sample.
    #[inline]
    pub fn layer(&self, l: usize) -> &[f64] {
        &self.per_layer[l]
    }
}
