pub mod loop_fn;
pub mod epoch_stats;
pub mod train_config;

pub use loop_fn::{train_loop, run_one_epoch, run_mini_batch, evaluate};
pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
