use crate::error::{Result, TopologyError};
use crate::simulate::constants::*;
use crate::store::Sample;
use hdrhistogram::Histogram;
use tracing::{debug, warn};

/// RTT percentiles over a set of samples, backed by an HDR histogram
pub struct Distribution {
    hist: Histogram<u64>,
    clamped_count: usize,
}

impl Distribution {
    pub fn new(samples: &[Sample]) -> Result<Self> {
        let mut hist = Histogram::<u64>::new_with_bounds(
            HISTOGRAM_LOW_BOUND_MS,
            HISTOGRAM_HIGH_BOUND_MS,
            HISTOGRAM_SIGNIFICANT_DIGITS,
        )
        .map_err(|e| TopologyError::Report(format!("Failed to create histogram: {}", e)))?;

        let mut clamped_count = 0;
        for sample in samples {
            let rtt = u64::from(sample.rtt_ms);
            let clamped = rtt.clamp(HISTOGRAM_LOW_BOUND_MS, HISTOGRAM_HIGH_BOUND_MS);
            if clamped != rtt {
                clamped_count += 1;
            }
            hist.record(clamped)
                .map_err(|e| TopologyError::Report(format!("Failed to record rtt {}: {}", rtt, e)))?;
        }

        if clamped_count > 0 {
            warn!(
                clamped_count = clamped_count,
                total_count = samples.len(),
                "Some RTTs were clamped to histogram bounds"
            );
        }
        debug!(count = hist.len(), "Distribution built");

        Ok(Self { hist, clamped_count })
    }

    pub fn mean(&self) -> f64 {
        self.hist.mean()
    }

    /// RTT at `quantile` in `[0, 1]`
    pub fn percentile(&self, quantile: f64) -> u64 {
        self.hist.value_at_quantile(quantile)
    }

    pub fn clamped_count(&self) -> usize {
        self.clamped_count
    }

    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
