/// MNIST digit classification demo.
///
/// Architecture: 784 → 30 → 10, sigmoid activations throughout
/// Cost:         cross-entropy (output layer is sigmoid, so the simplified
///               `a - y` output error applies)
/// Optimizer:    mini-batch SGD, η = 0.1, λ = 5.0, momentum = 0.2, batch 10
/// Epochs:       30
///
/// Run with:
///   cargo run --example mnist --release
///
/// Data files must be present at demos/mnist_data/ (IDX binary format).

use std::fs::File;
use std::io::Read;

use rand::SeedableRng;
use rand::rngs::StdRng;

use hematite_nn::{ActivationFunction, CostFunction, Network, TrainConfig, train_loop};

// ---------------------------------------------------------------------------
// Data loading helpers
// ---------------------------------------------------------------------------

/// Reads an IDX3 image file and returns a Vec of 784-element f64 Vecs,
/// with pixel values normalized from [0, 255] to [0.0, 1.0].
fn load_images(path: &str) -> Vec<Vec<f64>> {
    let mut file = File::open(path)
        .unwrap_or_else(|e| panic!("Cannot open image file '{}': {}", path, e));

    // Parse header.
    let mut buf4 = [0u8; 4];

    file.read_exact(&mut buf4).expect("Failed to read magic number");
    let magic = i32::from_be_bytes(buf4);
    assert_eq!(magic, 0x00000803, "Image file magic number mismatch (got {:#010x})", magic);

    file.read_exact(&mut buf4).expect("Failed to read image count");
    let n_images = i32::from_be_bytes(buf4) as usize;

    file.read_exact(&mut buf4).expect("Failed to read row count");
    let rows = i32::from_be_bytes(buf4) as usize;

    file.read_exact(&mut buf4).expect("Failed to read col count");
    let cols = i32::from_be_bytes(buf4) as usize;

    let n_pixels = rows * cols;
    assert_eq!(n_pixels, 784, "Expected 28×28 images (784 pixels), got {}×{}={}", rows, cols, n_pixels);

    // Read all pixel bytes at once, then normalize.
    let mut pixel_bytes = vec![0u8; n_images * n_pixels];
    file.read_exact(&mut pixel_bytes).expect("Failed to read pixel data");

    pixel_bytes
        .chunks(n_pixels)
        .map(|chunk| chunk.iter().map(|&p| p as f64 / 255.0).collect())
        .collect()
}

/// Reads an IDX1 label file and returns a Vec of one-hot Vec<f64> of length 10.
fn load_labels(path: &str) -> Vec<Vec<f64>> {
    let mut file = File::open(path)
        .unwrap_or_else(|e| panic!("Cannot open label file '{}': {}", path, e));

    let mut buf4 = [0u8; 4];

    file.read_exact(&mut buf4).expect("Failed to read magic number");
    let magic = i32::from_be_bytes(buf4);
    assert_eq!(magic, 0x00000801, "Label file magic number mismatch (got {:#010x})", magic);

    file.read_exact(&mut buf4).expect("Failed to read label count");
    let n_labels = i32::from_be_bytes(buf4) as usize;

    let mut label_bytes = vec![0u8; n_labels];
    file.read_exact(&mut label_bytes).expect("Failed to read label data");

    label_bytes
        .iter()
        .map(|&label| {
            let mut one_hot = vec![0.0f64; 10];
            one_hot[label as usize] = 1.0;
            one_hot
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    println!("Loading MNIST data...");
    let train_images = load_images("demos/mnist_data/train-images-idx3-ubyte");
    let train_labels = load_labels("demos/mnist_data/train-labels-idx1-ubyte");
    let test_images = load_images("demos/mnist_data/t10k-images-idx3-ubyte");
    let test_labels = load_labels("demos/mnist_data/t10k-labels-idx1-ubyte");
    println!("  {} training samples, {} test samples", train_images.len(), test_images.len());

    let mut rng = StdRng::seed_from_u64(42);
    let mut network = Network::new(
        vec![784, 30, 10],
        CostFunction::CrossEntropy,
        ActivationFunction::Sigmoid,
        &mut rng,
    )
    .expect("valid layer sizes");

    let config = TrainConfig::new(30, 10, 0.1, 5.0, 0.2);

    let last_loss = train_loop(
        &mut network,
        &train_images,
        &train_labels,
        Some(&test_images),
        Some(&test_labels),
        &config,
        &mut rng,
    )
    .expect("training failed");

    println!("Final mean training loss: {last_loss:.6}");

    network.save_json("mnist_model.json").expect("Failed to save model");
    println!("Model saved to mnist_model.json");
}
