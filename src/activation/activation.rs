use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    Tanh,
    ReLU,
}

impl ActivationFunction {
    /// Element-wise activation.
    ///
    /// The sigmoid branch uses the sign-split formulation so that `exp`
    /// never receives a large positive argument; `apply` stays finite for
    /// any input magnitude.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                if x >= 0.0 {
                    1.0 / (1.0 + (-x).exp())
                } else {
                    let e = x.exp();
                    e / (1.0 + e)
                }
            }
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Element-wise derivative, evaluated at the pre-activation value.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.apply(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
        }
    }
}
