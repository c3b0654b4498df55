//! Latency Topology - exchange-to-exchange latency history
//!
//! This library keeps a bounded, pair-indexed, time-windowed history of
//! round-trip-time samples between cloud-hosted exchange servers, feeds it
//! with reproducible synthetic (or replayed real) measurements, and answers
//! range queries and summary statistics over it.

pub mod clock;
pub mod error;
pub mod generator;
pub mod hub;
pub mod ingest;
pub mod logging;
pub mod query;
pub mod server;
pub mod simulate;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, TopologyError};
pub use generator::SampleGenerator;
pub use hub::LatencyHub;
pub use logging::{init_logging, init_logging_with_config};
pub use store::{compute_stats, PairKey, Sample, SampleStore, Stats, StoreConfig};
