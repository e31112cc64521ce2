//! Mini-batch training loop and the prediction path.
//!
//! `fit` drives epochs over mini-batches: gather rows (optionally through a
//! per-epoch index permutation), forward, loss accounting, backward + in-place
//! update. All buffers are allocated before the first step and sized to
//! `batch_size`; the ragged last batch of an epoch runs with a smaller live row
//! count instead of reallocating.
//!
//! Prediction reuses the forward engine only.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{BatchScratch, Dataset, Error, Inputs, Loss, Network, Result};

/// Sample-order policy for training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shuffle {
    /// Keep dataset order every epoch.
    #[default]
    None,
    /// Permute the sample index order once per epoch, deterministically.
    ///
    /// Only indices are permuted; the dataset is never copied or mutated.
    Seeded(u64),
}

#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    pub epochs: usize,
    pub batch_size: usize,
    /// Learning rate of the gradient-descent update.
    pub lr: f64,
    pub shuffle: Shuffle,
    pub loss: Loss,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            batch_size: 32,
            lr: 1e-5,
            shuffle: Shuffle::None,
            loss: Loss::Square,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FitReport {
    /// Average per-row loss of each epoch.
    pub epoch_losses: Vec<f64>,
    /// Average per-row loss of the final epoch.
    pub final_loss: f64,
}

impl Network {
    /// Train the network on a dataset with mini-batch gradient descent.
    ///
    /// Runs exactly `cfg.epochs` passes over all mini-batches; there is no
    /// convergence criterion or early stop. After each mini-batch the running
    /// average loss is reported through `log::debug!` together with the
    /// position inside the epoch.
    pub fn fit(&mut self, train: &Dataset, cfg: FitConfig) -> Result<FitReport> {
        if train.is_empty() {
            return Err(Error::InvalidData(
                "train dataset must not be empty".to_owned(),
            ));
        }
        if train.input_dim() != self.input_dim() {
            return Err(Error::ShapeMismatch {
                context: "fit inputs",
                expected: format!("input_dim {}", self.input_dim()),
                actual: format!("input_dim {}", train.input_dim()),
            });
        }
        if train.target_dim() != self.output_dim() {
            return Err(Error::ShapeMismatch {
                context: "fit targets",
                expected: format!("target_dim {}", self.output_dim()),
                actual: format!("target_dim {}", train.target_dim()),
            });
        }
        if cfg.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        if cfg.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if !(cfg.lr.is_finite() && cfg.lr > 0.0) {
            return Err(Error::InvalidConfig("lr must be finite and > 0".to_owned()));
        }

        let n = train.len();
        let in_dim = self.input_dim();
        let out_dim = self.output_dim();
        let batch_size = cfg.batch_size.min(n);
        let n_batches = n.div_ceil(cfg.batch_size);

        let mut scratch = self.batch_scratch(batch_size);
        let mut deltas = self.deltas();
        let mut batch_input = vec![0.0_f64; batch_size * in_dim];
        let mut batch_targets = vec![0.0_f64; batch_size * out_dim];
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = match cfg.shuffle {
            Shuffle::None => None,
            Shuffle::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
        };

        let mut epoch_losses = Vec::with_capacity(cfg.epochs);

        for epoch in 0..cfg.epochs {
            if let Some(rng) = rng.as_mut() {
                indices.shuffle(rng);
            }

            let mut epoch_loss = 0.0_f64;
            let mut rows_seen = 0usize;

            for batch in 0..n_batches {
                let start = batch * cfg.batch_size;
                let rows = cfg.batch_size.min(n - start);

                for r in 0..rows {
                    let idx = indices[start + r];
                    batch_input[r * in_dim..(r + 1) * in_dim].copy_from_slice(train.input(idx));
                    batch_targets[r * out_dim..(r + 1) * out_dim]
                        .copy_from_slice(train.target(idx));
                }

                self.forward_batch(&batch_input, rows, &mut scratch);

                let out = scratch.output(rows);
                for r in 0..rows {
                    epoch_loss += cfg.loss.forward(
                        &batch_targets[r * out_dim..(r + 1) * out_dim],
                        &out[r * out_dim..(r + 1) * out_dim],
                    );
                }
                rows_seen += rows;

                self.backward_batch(
                    &batch_input,
                    &batch_targets,
                    rows,
                    cfg.loss,
                    &scratch,
                    &mut deltas,
                    cfg.lr,
                );

                debug!(
                    "epoch {:.3}: avg loss = {:.6}",
                    epoch as f64 + (batch + 1) as f64 / n_batches as f64,
                    epoch_loss / rows_seen as f64
                );
            }

            let avg = epoch_loss / n as f64;
            info!("epoch {}/{}: avg loss = {:.6}", epoch + 1, cfg.epochs, avg);
            epoch_losses.push(avg);
        }

        let final_loss = *epoch_losses
            .last()
            .expect("epochs > 0 guarantees at least one entry");
        Ok(FitReport {
            epoch_losses,
            final_loss,
        })
    }

    /// Predict outputs for all rows of `inputs`.
    ///
    /// Returns a flat buffer with shape `(len, output_dim)`.
    pub fn predict(&self, inputs: &Inputs) -> Result<Vec<f64>> {
        if inputs.is_empty() {
            return Err(Error::InvalidData("inputs must not be empty".to_owned()));
        }
        if inputs.input_dim() != self.input_dim() {
            return Err(Error::ShapeMismatch {
                context: "predict inputs",
                expected: format!("input_dim {}", self.input_dim()),
                actual: format!("input_dim {}", inputs.input_dim()),
            });
        }

        let rows = inputs.len();
        let mut scratch = self.batch_scratch(rows);
        self.forward_batch(inputs.as_flat(), rows, &mut scratch);
        Ok(scratch.output(rows).to_vec())
    }

    /// Shape-checked, non-allocating single-row inference.
    ///
    /// `scratch` must have been built for this network (any `max_rows >= 1`).
    pub fn predict_into(
        &self,
        input: &[f64],
        scratch: &mut BatchScratch,
        out: &mut [f64],
    ) -> Result<()> {
        if input.len() != self.input_dim() {
            return Err(Error::ShapeMismatch {
                context: "predict_into input",
                expected: format!("len {}", self.input_dim()),
                actual: format!("len {}", input.len()),
            });
        }
        if out.len() != self.output_dim() {
            return Err(Error::ShapeMismatch {
                context: "predict_into output",
                expected: format!("len {}", self.output_dim()),
                actual: format!("len {}", out.len()),
            });
        }

        self.forward_batch(input, 1, scratch);
        out.copy_from_slice(scratch.output(1));
        Ok(())
    }

    /// Mean per-row loss over a dataset.
    pub fn evaluate(&self, data: &Dataset, loss: Loss) -> Result<f64> {
        if data.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        if data.input_dim() != self.input_dim() {
            return Err(Error::ShapeMismatch {
                context: "evaluate inputs",
                expected: format!("input_dim {}", self.input_dim()),
                actual: format!("input_dim {}", data.input_dim()),
            });
        }
        if data.target_dim() != self.output_dim() {
            return Err(Error::ShapeMismatch {
                context: "evaluate targets",
                expected: format!("target_dim {}", self.output_dim()),
                actual: format!("target_dim {}", data.target_dim()),
            });
        }

        let mut scratch = self.batch_scratch(1);
        let mut total = 0.0_f64;
        for idx in 0..data.len() {
            self.forward_batch(data.input(idx), 1, &mut scratch);
            total += loss.forward(data.target(idx), scratch.output(1));
        }
        Ok(total / data.len() as f64)
    }
}
