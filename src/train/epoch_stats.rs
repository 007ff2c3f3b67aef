use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch.
    pub train_loss: f64,
    /// Correctly classified test samples, if a test set was provided.
    pub correct: Option<usize>,
    /// Test set size, if a test set was provided.
    pub test_count: Option<usize>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
