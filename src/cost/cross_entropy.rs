use crate::activation::activation::ActivationFunction;
use crate::math::matrix::Matrix;

/// Binary cross-entropy cost, summed over the output vector.
pub struct CrossEntropyCost;

impl CrossEntropyCost {
    /// Scalar cost: Σ(−y·ln(a) − (1−y)·ln(1−a))
    ///
    /// A term of the form 0·ln(0) is indeterminate but has a well-defined
    /// limit of 0, so any non-finite term contributes zero instead of
    /// poisoning the sum with NaN/Inf.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, y)| {
                let term = -y * a.ln() - (1.0 - y) * (1.0 - a).ln();
                if term.is_finite() { term } else { 0.0 }
            })
            .sum()
    }

    /// Error at the output layer's pre-activation:
    ///   δ = a − y
    ///
    /// This is the cross-entropy derivative with the sigmoid derivative
    /// already cancelled out of it; it is only correct when the output layer
    /// activation is `Sigmoid`. Pairing it with any other activation would
    /// silently compute the wrong gradient, hence the assert.
    pub fn output_error(_z: &Matrix, a: &Matrix, y: &Matrix, activation: ActivationFunction) -> Matrix {
        debug_assert!(
            activation == ActivationFunction::Sigmoid,
            "cross-entropy output_error assumes a sigmoid output layer"
        );
        a.clone() - y.clone()
    }
}
