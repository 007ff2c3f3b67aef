use crate::activation::activation::ActivationFunction;
use crate::math::matrix::Matrix;

/// Quadratic (half sum-of-squares) cost.
pub struct QuadraticCost;

impl QuadraticCost {
    /// Scalar cost: 0.5 · ‖a − y‖²
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        0.5 * predicted.iter().zip(expected.iter())
            .map(|(a, y)| (a - y).powi(2))
            .sum::<f64>()
    }

    /// Error at the output layer's pre-activation:
    ///   δ = (a − y) ⊙ σ'(z)
    ///
    /// This is the seed delta for the backward pass; unlike cross-entropy it
    /// makes no assumption about which activation is in use.
    pub fn output_error(z: &Matrix, a: &Matrix, y: &Matrix, activation: ActivationFunction) -> Matrix {
        (a.clone() - y.clone()).hadamard(&z.map(|x| activation.derivative(x)))
    }
}
