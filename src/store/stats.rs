use crate::store::sample::Sample;
use serde::{Deserialize, Serialize};

/// Summary of the RTTs in a set of samples.
///
/// `avg` is the arithmetic mean rounded half up (which, for non-negative
/// values, is the same as rounding half away from zero).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub min: u32,
    pub max: u32,
    pub avg: u32,
    pub count: usize,
}

/// Compute stats over any slice of samples; all zeros for an empty slice.
pub fn compute_stats(samples: &[Sample]) -> Stats {
    if samples.is_empty() {
        return Stats::default();
    }

    let mut min = u32::MAX;
    let mut max = 0;
    let mut sum = 0u64;
    for sample in samples {
        min = min.min(sample.rtt_ms);
        max = max.max(sample.rtt_ms);
        sum += u64::from(sample.rtt_ms);
    }

    let count = samples.len() as u64;
    // floor(sum / count + 1/2) without going through floating point
    let avg = ((2 * sum + count) / (2 * count)) as u32;

    Stats {
        min,
        max,
        avg,
        count: samples.len(),
    }
}
