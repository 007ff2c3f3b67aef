use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::cost::cross_entropy::CrossEntropyCost;
use crate::cost::quadratic::QuadraticCost;
use crate::math::matrix::Matrix;

/// Selects which cost function the network trains against.
///
/// - `Quadratic`    — half sum-of-squares; valid with any activation.
/// - `CrossEntropy` — binary cross-entropy; its `output_error` is the
///   simplified `a − y` form and therefore requires a `Sigmoid` output
///   layer (see `CrossEntropyCost::output_error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    Quadratic,
    CrossEntropy,
}

impl CostFunction {
    /// Scalar cost of one prediction against its target.
    pub fn loss(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            CostFunction::Quadratic    => QuadraticCost::loss(predicted, expected),
            CostFunction::CrossEntropy => CrossEntropyCost::loss(predicted, expected),
        }
    }

    /// Gradient of the cost w.r.t. the output layer's pre-activation; the
    /// seed delta for backpropagation.
    pub fn output_error(&self, z: &Matrix, a: &Matrix, y: &Matrix, activation: ActivationFunction) -> Matrix {
        match self {
            CostFunction::Quadratic    => QuadraticCost::output_error(z, a, y, activation),
            CostFunction::CrossEntropy => CrossEntropyCost::output_error(z, a, y, activation),
        }
    }
}
