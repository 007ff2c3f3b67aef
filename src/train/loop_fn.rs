use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::NetworkError;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::{Sgd, Velocities};
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the mean training
/// loss of the **last completed epoch**.
///
/// # Arguments
/// - `network`       — mutable reference to the network; modified in place
/// - `train_inputs`  — training samples, each a `Vec<f64>` of length `sizes[0]`
/// - `train_targets` — one-hot targets of length `sizes[last]`, parallel to
///                     `train_inputs`
/// - `test_inputs`   — optional test samples, evaluated after every epoch
/// - `test_targets`  — optional test targets (required iff `test_inputs` is `Some`)
/// - `config`        — hyperparameters plus optional progress channel
/// - `rng`           — source of the per-epoch shuffles; seed it for
///                     reproducible runs
///
/// After each epoch one line is printed: `Epoch e: correct / total` when a
/// test set is present, otherwise just `Epoch e`. The same numbers go out on
/// `config.progress_tx` when configured; if that receiver has been dropped
/// the loop stops early.
///
/// There is no early stopping or convergence check; errors in any epoch
/// abort the whole run.
pub fn train_loop<R: Rng>(
    network: &mut Network,
    train_inputs: &[Vec<f64>],
    train_targets: &[Vec<f64>],
    test_inputs: Option<&[Vec<f64>]>,
    test_targets: Option<&[Vec<f64>]>,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<f64, NetworkError> {
    let optimizer = Sgd::new(config.learning_rate, config.momentum);
    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let train_loss = run_one_epoch(
            network,
            train_inputs,
            train_targets,
            &optimizer,
            config.batch_size,
            config.lambda,
            rng,
        )?;
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let (correct, test_count) = if let (Some(ti), Some(tt)) = (test_inputs, test_targets) {
            (Some(evaluate(network, ti, tt)?), Some(ti.len()))
        } else {
            (None, None)
        };

        match (correct, test_count) {
            (Some(c), Some(n)) => println!("Epoch {epoch}: {c} / {n}"),
            _ => println!("Epoch {epoch}"),
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            correct,
            test_count,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(last_train_loss)
}

/// Runs one full epoch of mini-batch SGD over the training data.
///
/// Shuffles the sample order, resets the momentum velocities, computes the
/// weight-decay factor `1 − η·λ/n` (applied once per mini-batch; the
/// regularization term is normalized by the full sample count, not the
/// batch size), then processes contiguous batches of `batch_size` — the
/// final batch may be smaller. Returns the mean loss over all samples.
pub fn run_one_epoch<R: Rng>(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    optimizer: &Sgd,
    batch_size: usize,
    lambda: f64,
    rng: &mut R,
) -> Result<f64, NetworkError> {
    let n = inputs.len();
    if n == 0 || batch_size == 0 {
        return Err(NetworkError::EmptyBatch);
    }
    if targets.len() != n {
        return Err(NetworkError::DimensionMismatch {
            what: "sample count",
            expected: n,
            actual: targets.len(),
        });
    }

    // Shuffle sample order each epoch; Fisher-Yates, so every permutation
    // is equally likely.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let mut velocities = Velocities::zeros_like(network);
    let weight_decay = 1.0 - optimizer.learning_rate * lambda / n as f64;

    let mut total_loss = 0.0;
    for batch in indices.chunks(batch_size) {
        total_loss += run_mini_batch(
            network,
            inputs,
            targets,
            batch,
            optimizer,
            &mut velocities,
            weight_decay,
        )?;
    }

    Ok(total_loss / n as f64)
}

/// Processes one mini-batch: accumulates gradients over every sample in
/// `batch` (indices into `inputs`/`targets`) via backpropagation, then
/// applies a single optimizer step. Returns the summed loss of the batch.
pub fn run_mini_batch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    batch: &[usize],
    optimizer: &Sgd,
    velocities: &mut Velocities,
    weight_decay: f64,
) -> Result<f64, NetworkError> {
    if batch.is_empty() {
        return Err(NetworkError::EmptyBatch);
    }

    // Zero-initialized gradient accumulators, one pair per layer.
    let mut acc_b: Vec<Matrix> = network.biases.iter()
        .map(|b| Matrix::zeros(b.rows, b.cols))
        .collect();
    let mut acc_w: Vec<Matrix> = network.weights.iter()
        .map(|w| Matrix::zeros(w.rows, w.cols))
        .collect();

    let mut batch_loss = 0.0;
    for &idx in batch {
        let input = &inputs[idx];
        let target = &targets[idx];

        // One forward pass per sample: backpropagation hands back the output
        // activation it already computed, so the loss costs nothing extra.
        let (nabla_b, nabla_w, output) = network.backpropagation_with_output(input, target)?;
        batch_loss += network.cost.loss(&output, target);

        for (acc, g) in acc_b.iter_mut().zip(nabla_b.into_iter()) {
            *acc = acc.clone() + g;
        }
        for (acc, g) in acc_w.iter_mut().zip(nabla_w.into_iter()) {
            *acc = acc.clone() + g;
        }
    }

    optimizer.step(network, velocities, acc_b, acc_w, batch.len(), weight_decay)?;

    Ok(batch_loss)
}

/// Counts correctly classified samples: a prediction is correct when the
/// argmax of the network output matches the argmax of the one-hot target.
pub fn evaluate(
    network: &Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
) -> Result<usize, NetworkError> {
    if targets.len() != inputs.len() {
        return Err(NetworkError::DimensionMismatch {
            what: "sample count",
            expected: inputs.len(),
            actual: targets.len(),
        });
    }

    let mut correct = 0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        if target.len() != network.output_size() {
            return Err(NetworkError::DimensionMismatch {
                what: "target vector",
                expected: network.output_size(),
                actual: target.len(),
            });
        }
        let output = network.feedforward(input)?;
        if argmax(&output) == argmax(target) {
            correct += 1;
        }
    }
    Ok(correct)
}

/// Index of the maximum element in a slice.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
