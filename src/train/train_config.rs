use std::sync::mpsc;

use crate::train::epoch_stats::EpochStats;

/// Hyperparameters for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — total number of full passes over the training data
/// - `batch_size`    — samples per mini-batch; use `1` for online SGD
/// - `learning_rate` — SGD step size (η)
/// - `lambda`        — L2 regularization strength; the loop turns it into a
///                     per-epoch weight-decay factor `1 − η·λ/n`
/// - `momentum`      — velocity coefficient in [0, 1); `0.0` disables momentum
/// - `progress_tx`   — optional channel sender; one `EpochStats` is sent per
///                     completed epoch. If the receiver is dropped the loop
///                     terminates early (clean shutdown).
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub lambda: f64,
    pub momentum: f64,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no progress channel.
    pub fn new(
        epochs: usize,
        batch_size: usize,
        learning_rate: f64,
        lambda: f64,
        momentum: f64,
    ) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            lambda,
            momentum,
            progress_tx: None,
        }
    }
}
