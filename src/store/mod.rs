//! Pair-partitioned, retention-bounded latency sample store

pub mod constants;
pub mod partition;
pub mod sample;
pub mod stats;

pub use constants::*;
pub use partition::{SampleStore, StoreConfig};
pub use sample::{PairKey, Sample};
pub use stats::{compute_stats, Stats};
