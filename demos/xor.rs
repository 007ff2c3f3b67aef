use rand::SeedableRng;
use rand::rngs::StdRng;

use hematite_nn::{ActivationFunction, CostFunction, Network, Sgd, run_one_epoch};

fn main() {
    let mut rng = StdRng::seed_from_u64(7);

    let mut network = Network::new(
        vec![2, 4, 2],
        CostFunction::Quadratic,
        ActivationFunction::Sigmoid,
        &mut rng,
    )
    .expect("valid layer sizes");

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    // One-hot targets: class 0 = "false", class 1 = "true".
    let targets = vec![
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ];

    let optimizer = Sgd::new(1.0, 0.9);
    let epochs = 5000;

    for epoch in 0..epochs {
        let loss = run_one_epoch(&mut network, &inputs, &targets, &optimizer, 4, 0.0, &mut rng)
            .expect("non-empty training data");
        if epoch % 500 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for input in &inputs {
        let output = network.feedforward(input).expect("input dimension matches");
        println!(
            "Input: {:?} -> [{:.4}, {:.4}] (xor = {})",
            input,
            output[0],
            output[1],
            if output[1] > output[0] { 1 } else { 0 }
        );
    }
}
