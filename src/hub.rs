//! Owner of one store and one generator sharing a clock

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::generator::{SampleGenerator, DEFAULT_SEED};
use crate::store::{compute_stats, Sample, SampleStore, Stats, StoreConfig};
use std::sync::Arc;
use tracing::info;

/// Process-level latency state: the sample store plus the generator that
/// feeds it.
///
/// Construct one per server or simulation and share it behind an `Arc`.
/// [`LatencyHub::reset`] clears the store and rewinds the generator to the
/// hub's seed in one step.
pub struct LatencyHub {
    store: SampleStore,
    generator: SampleGenerator,
    clock: Arc<dyn Clock>,
    seed: u64,
}

impl LatencyHub {
    /// Hub on the system clock with default bounds and seed
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), DEFAULT_SEED)
    }

    pub fn with_clock(clock: Arc<dyn Clock>, seed: u64) -> Self {
        let store = SampleStore::new(Arc::clone(&clock));
        Self::assemble(clock, seed, store)
    }

    /// Hub with custom store bounds; fails if `config` does not validate
    pub fn with_config(clock: Arc<dyn Clock>, seed: u64, config: StoreConfig) -> Result<Self> {
        let store = SampleStore::with_config(Arc::clone(&clock), config)?;
        Ok(Self::assemble(clock, seed, store))
    }

    fn assemble(clock: Arc<dyn Clock>, seed: u64, store: SampleStore) -> Self {
        Self {
            store,
            generator: SampleGenerator::with_seed(Arc::clone(&clock), seed),
            clock,
            seed,
        }
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn generator(&self) -> &SampleGenerator {
        &self.generator
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a sample and insert it. Returns a copy of what was stored.
    pub fn record_generated(&self, from_id: &str, to_id: &str, base_rtt_ms: f64) -> Sample {
        let sample = self.generator.generate(from_id, to_id, base_rtt_ms);
        self.store.insert(sample.clone());
        sample
    }

    pub fn query(&self, from: &str, to: &str, from_time: Option<i64>, to_time: Option<i64>) -> Vec<Sample> {
        self.store.query(from, to, from_time, to_time)
    }

    /// Stats over the same window [`LatencyHub::query`] would return
    pub fn pair_stats(&self, from: &str, to: &str, from_time: Option<i64>, to_time: Option<i64>) -> Stats {
        compute_stats(&self.store.query(from, to, from_time, to_time))
    }

    /// The cross-pair recent view, capped at the store's `recent_limit`
    pub fn recent(&self) -> Vec<Sample> {
        self.store.recent_across_all_pairs(self.store.config().recent_limit)
    }

    /// Clear every partition and rewind the generator
    pub fn reset(&self) {
        self.store.clear();
        self.generator.reset(self.seed);
        info!(seed = self.seed, "Latency hub reset");
    }
}

impl Default for LatencyHub {
    fn default() -> Self {
        Self::new()
    }
}
