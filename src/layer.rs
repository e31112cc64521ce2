//! A single dense layer: one affine transform plus a bound activation.

use rand::Rng;

use crate::matmul::gemm_f64;
use crate::{Activation, Error, Result};

#[derive(Debug, Clone)]
pub struct Layer {
    in_dim: usize,
    out_dim: usize,
    /// Row-major matrix with shape (in_dim, out_dim): row i holds the outgoing
    /// weights of input node i.
    weights: Vec<f64>,
    biases: Vec<f64>,
    activation: Activation,
}

impl Layer {
    /// Zero-filled layer. Used to pre-shape a network before loading persisted
    /// weights.
    #[inline]
    pub fn new(in_dim: usize, out_dim: usize, activation: Activation) -> Self {
        Self {
            in_dim,
            out_dim,
            weights: vec![0.0; in_dim * out_dim],
            biases: vec![0.0; out_dim],
            activation,
        }
    }

    /// Layer with every weight and bias drawn uniformly from `[-1, 1]`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let mut layer = Self::new(in_dim, out_dim, activation);
        for w in layer.weights.iter_mut() {
            *w = rng.random_range(-1.0..=1.0);
        }
        for b in layer.biases.iter_mut() {
            *b = rng.random_range(-1.0..=1.0);
        }
        layer
    }

    /// Build a layer from explicit parameters, validating lengths and
    /// finiteness.
    pub fn from_parts(
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        weights: Vec<f64>,
        biases: Vec<f64>,
    ) -> Result<Self> {
        if in_dim == 0 || out_dim == 0 {
            return Err(Error::InvalidData(format!(
                "layer dims must be > 0, got in_dim={in_dim} out_dim={out_dim}"
            )));
        }
        let expected_w = in_dim
            .checked_mul(out_dim)
            .ok_or_else(|| Error::InvalidData("layer weight shape overflow".to_owned()))?;
        if weights.len() != expected_w {
            return Err(Error::InvalidData(format!(
                "weights length {} does not match in_dim * out_dim ({in_dim} * {out_dim})",
                weights.len()
            )));
        }
        if biases.len() != out_dim {
            return Err(Error::InvalidData(format!(
                "biases length {} does not match out_dim {out_dim}",
                biases.len()
            )));
        }
        if weights.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "weights must contain only finite values".to_owned(),
            ));
        }
        if biases.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "biases must contain only finite values".to_owned(),
            ));
        }

        Ok(Self {
            in_dim,
            out_dim,
            weights,
            biases,
            activation,
        })
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    #[inline]
    pub fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    /// Forward pass for a batch of `rows` samples.
    ///
    /// Computes:
    /// - `z = input * W + b` (bias broadcast across rows, one GEMM call)
    /// - `out = activation(z)` element-wise
    ///
    /// Shape contract (programmer error to violate):
    /// - `input.len() >= rows * in_dim`
    /// - `z.len() >= rows * out_dim`, `out.len() >= rows * out_dim`
    pub fn forward_batch(&self, input: &[f64], rows: usize, z: &mut [f64], out: &mut [f64]) {
        assert!(rows > 0, "forward_batch requires rows > 0");
        assert!(
            input.len() >= rows * self.in_dim,
            "input len {} is short of rows * in_dim ({rows} * {})",
            input.len(),
            self.in_dim
        );
        assert!(
            z.len() >= rows * self.out_dim && out.len() >= rows * self.out_dim,
            "z/out len ({}, {}) short of rows * out_dim ({rows} * {})",
            z.len(),
            out.len(),
            self.out_dim
        );

        // The bias is the beta=1 accumulation base of the GEMM.
        for r in 0..rows {
            z[r * self.out_dim..(r + 1) * self.out_dim].copy_from_slice(&self.biases);
        }

        gemm_f64(
            rows,
            self.out_dim,
            self.in_dim,
            1.0,
            input,
            self.in_dim,
            1,
            &self.weights,
            self.out_dim,
            1,
            1.0,
            z,
            self.out_dim,
            1,
        );

        let act = self.activation;
        for i in 0..rows * self.out_dim {
            out[i] = act.forward(z[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_validates_lengths_and_finiteness() {
        assert!(Layer::from_parts(2, 2, Activation::Linear, vec![0.0; 3], vec![0.0; 2]).is_err());
        assert!(Layer::from_parts(2, 2, Activation::Linear, vec![0.0; 4], vec![0.0; 3]).is_err());
        assert!(
            Layer::from_parts(
                2,
                2,
                Activation::Linear,
                vec![0.0, f64::NAN, 0.0, 0.0],
                vec![0.0; 2]
            )
            .is_err()
        );
        assert!(Layer::from_parts(2, 2, Activation::Linear, vec![0.0; 4], vec![0.0; 2]).is_ok());
    }

    #[test]
    fn forward_batch_applies_affine_then_activation() {
        // W = [[1, 0], [0, 1], [1, 1]], b = [0.5, -0.5], relu on top.
        let layer = Layer::from_parts(
            3,
            2,
            Activation::ReLU,
            vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.5, -0.5],
        )
        .unwrap();

        let input = [1.0, 2.0, 3.0, -1.0, 0.0, 0.0];
        let mut z = [0.0; 4];
        let mut out = [0.0; 4];
        layer.forward_batch(&input, 2, &mut z, &mut out);

        assert_eq!(z, [4.5, 4.5, -0.5, -0.5]);
        assert_eq!(out, [4.5, 4.5, 0.0, 0.0]);
    }

    #[test]
    fn random_init_stays_in_unit_interval() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(7);
        let layer = Layer::new_with_rng(8, 8, Activation::Tanh, &mut rng);
        assert!(layer.weights().iter().all(|w| (-1.0..=1.0).contains(w)));
        assert!(layer.biases().iter().all(|b| (-1.0..=1.0).contains(b)));
        // Not all zero.
        assert!(layer.weights().iter().any(|w| *w != 0.0));
    }
}
