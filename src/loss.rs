//! Loss functions.
//!
//! A loss pairs a per-row value with a per-scalar output derivative. The
//! training loop computes the value for reporting and feeds the derivative into
//! the backward pass:
//!
//! - run `network.forward_batch(...)`
//! - accumulate `loss.forward(target_row, out_row)` per row
//! - the backward pass starts each output delta from `loss.d_output(t, y)`

/// Supported loss functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loss {
    /// Half sum of squared errors over one row: `0.5 * sum((t - y)^2)`.
    #[default]
    Square,
}

impl Loss {
    /// Loss value for one row.
    ///
    /// Shape contract: `target.len() == out.len()`.
    #[inline]
    pub fn forward(self, target: &[f64], out: &[f64]) -> f64 {
        match self {
            Loss::Square => square_loss(target, out),
        }
    }

    /// Derivative of the loss w.r.t. one network output scalar.
    #[inline]
    pub fn d_output(self, target: f64, out: f64) -> f64 {
        match self {
            Loss::Square => square_loss_d_output(target, out),
        }
    }
}

/// `0.5 * sum((target - out)^2)` over one row.
#[inline]
pub fn square_loss(target: &[f64], out: &[f64]) -> f64 {
    assert_eq!(
        target.len(),
        out.len(),
        "target len {} does not match out len {}",
        target.len(),
        out.len()
    );

    let mut sum_sq = 0.0_f64;
    for i in 0..target.len() {
        let diff = target[i] - out[i];
        sum_sq = diff.mul_add(diff, sum_sq);
    }
    0.5 * sum_sq
}

/// `d(square_loss)/d(out) = out - target` for one scalar output.
#[inline]
pub fn square_loss_d_output(target: f64, out: f64) -> f64 {
    out - target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_loss_is_zero_when_equal() {
        let row = [1.0_f64, -2.0, 0.5];
        assert_eq!(square_loss(&row, &row), 0.0);
    }

    #[test]
    fn square_loss_matches_hand_computation() {
        let target = [2.0_f64, 1.0];
        let out = [1.0_f64, 3.0];
        // 0.5 * ((2-1)^2 + (1-3)^2) = 0.5 * 5 = 2.5
        assert!((square_loss(&target, &out) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn d_output_points_from_target_to_out() {
        assert_eq!(square_loss_d_output(1.0, 3.0), 2.0);
        assert_eq!(square_loss_d_output(3.0, 1.0), -2.0);
        assert_eq!(Loss::Square.d_output(0.5, 0.5), 0.0);
    }
}
