// This binary crate is intentionally minimal.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run examples with:
//   cargo run --example xor
fn main() {
    println!("hematite-nn: mini-batch SGD with momentum for fully-connected networks.");
    println!("Run `cargo run --example xor` to see the XOR demo.");
}
