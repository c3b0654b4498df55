//! Reproducible synthetic latency samples

pub mod rng;

pub use rng::{SeededRandom, DEFAULT_SEED};

use crate::clock::Clock;
use crate::store::Sample;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Lowest RTT the generator will ever report, in milliseconds
pub const MIN_RTT_MS: f64 = 5.0;

/// Half-width of the symmetric variance term
pub const VARIANCE_MS: f64 = 10.0;

/// Upper bound of the non-negative jitter term
pub const JITTER_MS: f64 = 10.0;

/// Synthetic RTT generator sharing one [`SeededRandom`] sequence.
///
/// Each sample consumes exactly two values from the sequence (variance, then
/// jitter), so the same seed and the same call order always reproduce the
/// same RTTs. Timestamps come from the clock, not the sequence.
pub struct SampleGenerator {
    rng: Mutex<SeededRandom>,
    clock: Arc<dyn Clock>,
}

impl SampleGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_seed(clock, DEFAULT_SEED)
    }

    pub fn with_seed(clock: Arc<dyn Clock>, seed: u64) -> Self {
        Self {
            rng: Mutex::new(SeededRandom::new(seed)),
            clock,
        }
    }

    /// Produce a sample for `from_id -> to_id` around `base_rtt_ms`.
    ///
    /// `rtt = max(5, base + U[-10, 10) + U[0, 10))`, rounded to the nearest
    /// millisecond.
    pub fn generate(&self, from_id: &str, to_id: &str, base_rtt_ms: f64) -> Sample {
        let (variance, jitter) = {
            let mut rng = self.rng.lock();
            let variance = rng.next_f64() * 2.0 * VARIANCE_MS - VARIANCE_MS;
            let jitter = rng.next_f64() * JITTER_MS;
            (variance, jitter)
        };

        let rtt = (base_rtt_ms.max(0.0) + variance + jitter).max(MIN_RTT_MS);
        let sample = Sample::new(from_id, to_id, self.clock.now_ms(), rtt.round() as u32);

        debug!(
            from = from_id,
            to = to_id,
            base_rtt_ms = base_rtt_ms,
            rtt_ms = sample.rtt_ms,
            "Generated sample"
        );
        sample
    }

    /// Restart the sequence from `seed`
    pub fn reset(&self, seed: u64) {
        *self.rng.lock() = SeededRandom::new(seed);
    }
}
