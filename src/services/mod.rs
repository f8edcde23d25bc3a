pub mod config_store;
pub mod stats;

pub use config_store::ConfigStore;
pub use stats::{FetchOptions, StatsTracker};
