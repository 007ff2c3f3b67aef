use crate::error::NetworkError;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Momentum state for SGD: one velocity tensor per parameter tensor.
///
/// Velocities live for one epoch: the training loop zeroes them at the start
/// of every epoch and `Sgd::step` advances them once per mini-batch.
pub struct Velocities {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
}

impl Velocities {
    pub fn zeros_like(network: &Network) -> Velocities {
        Velocities {
            weights: network.weights.iter()
                .map(|w| Matrix::zeros(w.rows, w.cols))
                .collect(),
            biases: network.biases.iter()
                .map(|b| Matrix::zeros(b.rows, b.cols))
                .collect(),
        }
    }
}

/// Mini-batch SGD with momentum.
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum }
    }

    /// Applies one parameter update from gradients summed over a mini-batch.
    ///
    /// The learning rate is scaled by `1/batch_size` so the step uses the
    /// batch-mean gradient. Per tensor:
    ///
    ///   v = momentum·v − (η/batch_size)·∇
    ///   b = b + v_b
    ///   w = weight_decay·w + v_w
    ///
    /// `weight_decay` is the multiplicative L2 shrinkage factor computed
    /// once per epoch by the training loop; biases are not decayed.
    pub fn step(
        &self,
        network: &mut Network,
        velocities: &mut Velocities,
        nabla_b: Vec<Matrix>,
        nabla_w: Vec<Matrix>,
        batch_size: usize,
        weight_decay: f64,
    ) -> Result<(), NetworkError> {
        if batch_size == 0 {
            return Err(NetworkError::EmptyBatch);
        }
        let scaled_rate = self.learning_rate / batch_size as f64;

        for (i, (gb, gw)) in nabla_b.into_iter().zip(nabla_w.into_iter()).enumerate() {
            velocities.biases[i] =
                velocities.biases[i].map(|v| self.momentum * v) - gb.map(|g| scaled_rate * g);
            velocities.weights[i] =
                velocities.weights[i].map(|v| self.momentum * v) - gw.map(|g| scaled_rate * g);

            network.biases[i] =
                network.biases[i].clone() + velocities.biases[i].clone();
            network.weights[i] =
                network.weights[i].map(|w| weight_decay * w) + velocities.weights[i].clone();
        }

        Ok(())
    }
}
