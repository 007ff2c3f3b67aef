use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::cost::cost_type::CostFunction;
use crate::error::NetworkError;
use crate::math::matrix::Matrix;

/// A fully-connected feedforward network.
///
/// `sizes[0]` is the input dimension and `sizes[sizes.len() - 1]` the output
/// dimension. For each non-input layer `l` (0-indexed over `weights`),
/// `weights[l]` has shape `[sizes[l + 1] × sizes[l]]` and `biases[l]` is a
/// `[sizes[l + 1] × 1]` column; the shapes are fixed at construction and
/// every update preserves them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub sizes: Vec<usize>,
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
    pub cost: CostFunction,
    pub activation: ActivationFunction,
}

impl Network {
    /// Builds a network with randomly initialized parameters.
    ///
    /// Biases are drawn from N(0, 1). Weights are drawn from
    /// N(0, 1/fan_in), i.e. standard deviation `1/sqrt(fan_in)` where
    /// fan_in is the size of the preceding layer.
    ///
    /// All randomness comes from the caller-supplied `rng`; seed it to get
    /// reproducible initializations.
    pub fn new<R: Rng>(
        sizes: Vec<usize>,
        cost: CostFunction,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Result<Network, NetworkError> {
        if sizes.len() < 2 || sizes.iter().any(|&s| s == 0) {
            return Err(NetworkError::InvalidLayerSizes(sizes));
        }

        let biases = sizes[1..].iter()
            .map(|&n| Matrix::gaussian(n, 1, 1.0, rng))
            .collect();
        let weights = sizes.windows(2)
            .map(|pair| {
                let (fan_in, fan_out) = (pair[0], pair[1]);
                Matrix::gaussian(fan_out, fan_in, 1.0 / (fan_in as f64).sqrt(), rng)
            })
            .collect();

        Ok(Network { sizes, weights, biases, cost, activation })
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Forward pass: for each layer, `z = W·a + b` then `a = act(z)`.
    /// Pure function of the current parameters; no state is cached.
    pub fn feedforward(&self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if input.len() != self.input_size() {
            return Err(NetworkError::DimensionMismatch {
                what: "input vector",
                expected: self.input_size(),
                actual: input.len(),
            });
        }

        let mut a = Matrix::column(input);
        for (w, b) in self.weights.iter().zip(self.biases.iter()) {
            let z = w.clone() * a + b.clone();
            a = z.map(|x| self.activation.apply(x));
        }
        Ok(a.into_column())
    }

    /// Computes the gradient of the cost for a single sample.
    ///
    /// Runs a forward pass caching every pre-activation `z` and activation
    /// `a`, seeds the backward pass with `cost.output_error(...)`, then
    /// walks the layers in reverse:
    ///
    ///   δ_l = (W_{l+1}ᵀ · δ_{l+1}) ⊙ act'(z_l)
    ///
    /// Returns `(bias_gradients, weight_gradients)`, one matrix per
    /// non-input layer, ordered input → output.
    pub fn backpropagation(
        &self,
        input: &[f64],
        target: &[f64],
    ) -> Result<(Vec<Matrix>, Vec<Matrix>), NetworkError> {
        let (nabla_b, nabla_w, _) = self.backpropagation_with_output(input, target)?;
        Ok((nabla_b, nabla_w))
    }

    /// Like `backpropagation`, but also returns the output activation from
    /// the forward pass, so callers that report the per-sample loss do not
    /// need a second feedforward.
    pub fn backpropagation_with_output(
        &self,
        input: &[f64],
        target: &[f64],
    ) -> Result<(Vec<Matrix>, Vec<Matrix>, Vec<f64>), NetworkError> {
        if input.len() != self.input_size() {
            return Err(NetworkError::DimensionMismatch {
                what: "input vector",
                expected: self.input_size(),
                actual: input.len(),
            });
        }
        if target.len() != self.output_size() {
            return Err(NetworkError::DimensionMismatch {
                what: "target vector",
                expected: self.output_size(),
                actual: target.len(),
            });
        }

        let n = self.weights.len();

        // Forward pass, caching z and a per layer. activations[l] is the
        // input to non-input layer l, so it ends up with n + 1 entries.
        let mut activations = Vec::with_capacity(n + 1);
        let mut pre_activations = Vec::with_capacity(n);
        activations.push(Matrix::column(input));

        for (w, b) in self.weights.iter().zip(self.biases.iter()) {
            let z = w.clone() * activations[activations.len() - 1].clone() + b.clone();
            activations.push(z.map(|x| self.activation.apply(x)));
            pre_activations.push(z);
        }

        let output = activations[n].clone().into_column();

        let mut nabla_b: Vec<Matrix> = self.biases.iter()
            .map(|b| Matrix::zeros(b.rows, b.cols))
            .collect();
        let mut nabla_w: Vec<Matrix> = self.weights.iter()
            .map(|w| Matrix::zeros(w.rows, w.cols))
            .collect();

        // Output layer.
        let y = Matrix::column(target);
        let mut delta = self.cost.output_error(
            &pre_activations[n - 1],
            &activations[n],
            &y,
            self.activation,
        );
        nabla_w[n - 1] = delta.clone() * activations[n - 1].transpose();
        nabla_b[n - 1] = delta.clone();

        // Hidden layers, output → input.
        for l in (0..n - 1).rev() {
            let act_derivative = pre_activations[l].map(|x| self.activation.derivative(x));
            delta = (self.weights[l + 1].transpose() * delta).hadamard(&act_derivative);
            nabla_w[l] = delta.clone() * activations[l].transpose();
            nabla_b[l] = delta.clone();
        }

        Ok((nabla_b, nabla_w, output))
    }

    /// Serializes the network parameters to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
