/// Errors surfaced by network construction, evaluation and training.
///
/// Numeric issues inside the cost functions (e.g. `log(0)` in cross-entropy)
/// are sanitized to a zero contribution at the source and never show up here.
#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    /// A network needs an input layer and at least one parameterized layer,
    /// and every layer must have at least one neuron.
    #[error("invalid layer sizes {0:?}: need length >= 2 with all sizes positive")]
    InvalidLayerSizes(Vec<usize>),

    /// An input/target vector (or sample count) disagrees with the
    /// configured layer sizes. Checked at the entry of feedforward,
    /// backpropagation and the training loop.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Training set or mini-batch of size zero; the `1/len` scaling in the
    /// update rule would otherwise divide by zero.
    #[error("empty batch: training set and batch_size must both be at least 1")]
    EmptyBatch,
}
