pub mod math;
pub mod activation;
pub mod cost;
pub mod network;
pub mod optim;
pub mod train;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use cost::cost_type::CostFunction;
pub use network::network::Network;
pub use optim::sgd::{Sgd, Velocities};
pub use train::loop_fn::{train_loop, run_one_epoch, run_mini_batch, evaluate};
pub use train::train_config::TrainConfig;
pub use train::epoch_stats::EpochStats;
pub use error::NetworkError;
