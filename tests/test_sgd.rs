// Optimizer semantics: a hand-traceable single mini-batch step, the momentum
// and weight-decay update algebra, full-batch accumulation, and seeded
// reproducibility of whole training runs.

use rand::SeedableRng;
use rand::rngs::StdRng;

use hematite_nn::{
    ActivationFunction, CostFunction, Matrix, Network, Sgd, Velocities, run_mini_batch,
    run_one_epoch,
};

fn sigmoid(z: f64) -> f64 {
    ActivationFunction::Sigmoid.apply(z)
}

fn sigmoid_prime(z: f64) -> f64 {
    ActivationFunction::Sigmoid.derivative(z)
}

/// Fixed-parameter [2, 3, 1] network for the hand-computed scenario.
fn fixed_network() -> Network {
    let mut rng = StdRng::seed_from_u64(0);
    let mut network = Network::new(
        vec![2, 3, 1],
        CostFunction::Quadratic,
        ActivationFunction::Sigmoid,
        &mut rng,
    )
    .unwrap();

    network.weights[0] = Matrix::from_data(vec![
        vec![0.2, -0.4],
        vec![0.5, 0.1],
        vec![-0.3, 0.8],
    ]);
    network.biases[0] = Matrix::from_data(vec![vec![0.1], vec![-0.2], vec![0.05]]);
    network.weights[1] = Matrix::from_data(vec![vec![0.7, -0.6, 0.25]]);
    network.biases[1] = Matrix::from_data(vec![vec![0.3]]);
    network
}

#[test]
fn single_mini_batch_step_matches_hand_computation() {
    let mut network = fixed_network();
    let inputs = vec![vec![1.0, 0.0]];
    let targets = vec![vec![1.0]];

    // η = 0.1, momentum = 0, weight decay factor = 1.0, batch of one sample.
    let optimizer = Sgd::new(0.1, 0.0);
    let mut velocities = Velocities::zeros_like(&network);

    let w1 = network.weights[0].clone();
    let b1 = network.biases[0].clone();
    let w2 = network.weights[1].clone();
    let b2 = network.biases[1].clone();

    run_mini_batch(&mut network, &inputs, &targets, &[0], &optimizer, &mut velocities, 1.0)
        .unwrap();

    // Forward pass by hand.
    let x = [1.0, 0.0];
    let z1: Vec<f64> = (0..3)
        .map(|i| w1.data[i][0] * x[0] + w1.data[i][1] * x[1] + b1.data[i][0])
        .collect();
    let a1: Vec<f64> = z1.iter().map(|&z| sigmoid(z)).collect();
    let z2 = w2.data[0][0] * a1[0] + w2.data[0][1] * a1[1] + w2.data[0][2] * a1[2]
        + b2.data[0][0];
    let a2 = sigmoid(z2);

    // Output layer error for the quadratic cost, then the chain rule back
    // through the hidden layer.
    let delta2 = (a2 - 1.0) * sigmoid_prime(z2);
    let delta1: Vec<f64> = (0..3)
        .map(|j| w2.data[0][j] * delta2 * sigmoid_prime(z1[j]))
        .collect();

    // One step with batch size 1: parameter -= 0.1 · gradient.
    let tol = 1e-12;
    assert!((network.biases[1].data[0][0] - (b2.data[0][0] - 0.1 * delta2)).abs() < tol);
    for j in 0..3 {
        let expected_w2 = w2.data[0][j] - 0.1 * delta2 * a1[j];
        assert!((network.weights[1].data[0][j] - expected_w2).abs() < tol);

        let expected_b1 = b1.data[j][0] - 0.1 * delta1[j];
        assert!((network.biases[0].data[j][0] - expected_b1).abs() < tol);

        let expected_w1_0 = w1.data[j][0] - 0.1 * delta1[j] * x[0];
        let expected_w1_1 = w1.data[j][1] - 0.1 * delta1[j] * x[1];
        assert!((network.weights[0].data[j][0] - expected_w1_0).abs() < tol);
        assert!((network.weights[0].data[j][1] - expected_w1_1).abs() < tol);
    }
}

#[test]
fn backpropagation_output_matches_feedforward() {
    let network = fixed_network();
    let input = [0.3, -0.6];
    let target = [1.0];

    let (_, _, output) = network.backpropagation_with_output(&input, &target).unwrap();
    assert_eq!(output, network.feedforward(&input).unwrap());
}

#[test]
fn mini_batch_loss_is_summed_over_pre_update_parameters() {
    let network = fixed_network();
    let inputs = vec![vec![1.0, 0.0], vec![0.2, 0.9]];
    let targets = vec![vec![1.0], vec![0.0]];

    // The reported batch loss comes from the same forward pass that feeds
    // backpropagation, i.e. it is measured against the parameters as they
    // were before the update step.
    let expected: f64 = inputs.iter().zip(targets.iter())
        .map(|(x, y)| network.cost.loss(&network.feedforward(x).unwrap(), y))
        .sum();

    let mut trained = network.clone();
    let optimizer = Sgd::new(0.1, 0.0);
    let mut velocities = Velocities::zeros_like(&trained);
    let loss = run_mini_batch(&mut trained, &inputs, &targets, &[0, 1], &optimizer, &mut velocities, 1.0)
        .unwrap();

    assert_eq!(loss, expected);
}

#[test]
fn step_applies_momentum_and_weight_decay() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut network = Network::new(
        vec![1, 1],
        CostFunction::Quadratic,
        ActivationFunction::Sigmoid,
        &mut rng,
    )
    .unwrap();
    network.weights[0] = Matrix::from_data(vec![vec![2.0]]);
    network.biases[0] = Matrix::from_data(vec![vec![0.5]]);

    let optimizer = Sgd::new(0.2, 0.5);
    let mut velocities = Velocities::zeros_like(&network);

    // First step: g_w = 1.0, g_b = 2.0, batch of 2 → scaled rate 0.1.
    optimizer
        .step(
            &mut network,
            &mut velocities,
            vec![Matrix::from_data(vec![vec![2.0]])],
            vec![Matrix::from_data(vec![vec![1.0]])],
            2,
            0.9,
        )
        .unwrap();

    // v_w = -0.1·1 = -0.1; w = 0.9·2 + v_w = 1.7
    // v_b = -0.1·2 = -0.2; b = 0.5 + v_b = 0.3
    assert!((network.weights[0].data[0][0] - 1.7).abs() < 1e-12);
    assert!((network.biases[0].data[0][0] - 0.3).abs() < 1e-12);

    // Second step with fresh gradients: the velocity must carry over.
    optimizer
        .step(
            &mut network,
            &mut velocities,
            vec![Matrix::from_data(vec![vec![1.0]])],
            vec![Matrix::from_data(vec![vec![1.0]])],
            2,
            0.9,
        )
        .unwrap();

    // v_w = 0.5·(-0.1) − 0.1·1 = -0.15; w = 0.9·1.7 − 0.15 = 1.38
    // v_b = 0.5·(-0.2) − 0.1·1 = -0.2;  b = 0.3 − 0.2 = 0.1
    assert!((network.weights[0].data[0][0] - 1.38).abs() < 1e-12);
    assert!((network.biases[0].data[0][0] - 0.1).abs() < 1e-12);
}

#[test]
fn full_batch_update_accumulates_all_sample_gradients() {
    let mut rng = StdRng::seed_from_u64(21);
    let network = Network::new(
        vec![2, 3, 2],
        CostFunction::Quadratic,
        ActivationFunction::Sigmoid,
        &mut rng,
    )
    .unwrap();

    let inputs = vec![
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![0.5, 0.5],
        vec![-1.0, 0.3],
        vec![0.2, -0.8],
    ];
    let targets = vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ];
    let batch: Vec<usize> = (0..inputs.len()).collect();
    let optimizer = Sgd::new(0.3, 0.0);

    // Reference: accumulate per-sample gradients in the same order, then
    // apply a single step.
    let mut expected = network.clone();
    let mut acc_b: Vec<Matrix> = expected.biases.iter()
        .map(|b| Matrix::zeros(b.rows, b.cols))
        .collect();
    let mut acc_w: Vec<Matrix> = expected.weights.iter()
        .map(|w| Matrix::zeros(w.rows, w.cols))
        .collect();
    for i in &batch {
        let (nabla_b, nabla_w) = expected.backpropagation(&inputs[*i], &targets[*i]).unwrap();
        for (acc, g) in acc_b.iter_mut().zip(nabla_b.into_iter()) {
            *acc = acc.clone() + g;
        }
        for (acc, g) in acc_w.iter_mut().zip(nabla_w.into_iter()) {
            *acc = acc.clone() + g;
        }
    }
    let mut expected_vel = Velocities::zeros_like(&expected);
    optimizer
        .step(&mut expected, &mut expected_vel, acc_b, acc_w, batch.len(), 1.0)
        .unwrap();

    // Implementation under test: one full-batch mini-batch.
    let mut actual = network.clone();
    let mut velocities = Velocities::zeros_like(&actual);
    run_mini_batch(&mut actual, &inputs, &targets, &batch, &optimizer, &mut velocities, 1.0)
        .unwrap();

    for l in 0..actual.weights.len() {
        assert_eq!(actual.weights[l].data, expected.weights[l].data);
        assert_eq!(actual.biases[l].data, expected.biases[l].data);
    }
}

#[test]
fn seeded_training_runs_are_bit_identical() {
    let inputs: Vec<Vec<f64>> = (0..16)
        .map(|i| vec![(i % 4) as f64 * 0.25, (i / 4) as f64 * 0.25])
        .collect();
    let targets: Vec<Vec<f64>> = (0..16)
        .map(|i| if i % 2 == 0 { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
        .collect();

    let run = || {
        let mut init_rng = StdRng::seed_from_u64(123);
        let mut network = Network::new(
            vec![2, 5, 2],
            CostFunction::CrossEntropy,
            ActivationFunction::Sigmoid,
            &mut init_rng,
        )
        .unwrap();
        let optimizer = Sgd::new(0.5, 0.3);
        let mut shuffle_rng = StdRng::seed_from_u64(9);
        for _ in 0..3 {
            run_one_epoch(&mut network, &inputs, &targets, &optimizer, 4, 0.1, &mut shuffle_rng)
                .unwrap();
        }
        network
    };

    let first = run();
    let second = run();

    for l in 0..first.weights.len() {
        assert_eq!(first.weights[l].data, second.weights[l].data);
        assert_eq!(first.biases[l].data, second.biases[l].data);
    }
}
