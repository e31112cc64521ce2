//! Activation functions.
//!
//! A dense layer computes a pre-activation value `z = x W + b` and then applies
//! an activation function element-wise: `y = activation(z)`.
//!
//! This crate caches both `z` and `y` per layer in [`crate::BatchScratch`], so
//! derivatives are taken at the pre-activation value `z` directly. All functions
//! are total over finite input.

/// Element-wise activation function.
///
/// The set is closed: activations carry no state and are stored per layer as
/// plain `Copy` values, never cloned or boxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Sigmoid,
    ReLU,
    /// ReLU with a fixed 0.01 slope for negative input.
    LeakyReLU,
    Softplus,
    Linear,
    Tanh,
}

/// Negative-side slope of [`Activation::LeakyReLU`].
const LEAKY_SLOPE: f64 = 0.01;

impl Activation {
    #[inline]
    pub fn forward(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(z),
            Activation::ReLU => z.max(0.0),
            Activation::LeakyReLU => {
                if z > 0.0 {
                    z
                } else {
                    LEAKY_SLOPE * z
                }
            }
            Activation::Softplus => softplus(z),
            Activation::Linear => z,
            Activation::Tanh => z.tanh(),
        }
    }

    /// Derivative of the activation at pre-activation `z`.
    #[inline]
    pub fn derivative(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let s = sigmoid(z);
                s * (1.0 - s)
            }
            Activation::ReLU => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::LeakyReLU => {
                if z > 0.0 {
                    1.0
                } else {
                    LEAKY_SLOPE
                }
            }
            Activation::Softplus => sigmoid(z),
            Activation::Linear => 1.0,
            Activation::Tanh => {
                let t = z.tanh();
                1.0 - t * t
            }
        }
    }
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    // Numerically stable split: never exponentiates a large positive argument.
    if z >= 0.0 {
        let e = (-z).exp();
        1.0 / (1.0 + e)
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[inline]
fn softplus(z: f64) -> f64 {
    // ln(1 + e^z) overflows for large z; in that regime softplus(z) == z to
    // double precision.
    if z > 36.0 {
        z
    } else {
        z.exp().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [Activation; 6] = [
        Activation::Sigmoid,
        Activation::ReLU,
        Activation::LeakyReLU,
        Activation::Softplus,
        Activation::Linear,
        Activation::Tanh,
    ];

    #[test]
    fn derivatives_match_central_difference() {
        let xs = [-5.0, -2.3, -0.5, 0.1, 0.5, 1.7, 4.0, 8.5];
        let h = 1e-6;

        for act in ALL {
            for &x in &xs {
                let numeric = (act.forward(x + h) - act.forward(x - h)) / (2.0 * h);
                let analytic = act.derivative(x);
                assert_abs_diff_eq!(analytic, numeric, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn activations_are_finite_for_extreme_input() {
        for act in ALL {
            for &x in &[-1e3, -50.0, 50.0, 1e3] {
                assert!(act.forward(x).is_finite(), "{act:?}.forward({x})");
                assert!(act.derivative(x).is_finite(), "{act:?}.derivative({x})");
            }
        }
    }

    #[test]
    fn sigmoid_basic_values() {
        assert_abs_diff_eq!(Activation::Sigmoid.forward(0.0), 0.5, epsilon = 1e-12);
        assert!(Activation::Sigmoid.forward(10.0) > 0.999);
        assert!(Activation::Sigmoid.forward(-10.0) < 0.001);
    }

    #[test]
    fn relu_and_leaky_relu_shapes() {
        assert_eq!(Activation::ReLU.forward(-2.0), 0.0);
        assert_eq!(Activation::ReLU.forward(3.0), 3.0);
        assert_eq!(Activation::LeakyReLU.forward(-2.0), -0.02);
        assert_eq!(Activation::LeakyReLU.forward(3.0), 3.0);
        assert_eq!(Activation::LeakyReLU.derivative(-1.0), 0.01);
        assert_eq!(Activation::LeakyReLU.derivative(1.0), 1.0);
    }

    #[test]
    fn softplus_tracks_identity_for_large_input() {
        assert_abs_diff_eq!(Activation::Softplus.forward(100.0), 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            Activation::Softplus.forward(0.0),
            std::f64::consts::LN_2,
            epsilon = 1e-12
        );
    }
}
