use crate::error::Result;
use crate::ingest::endpoint::Endpoint;
use crate::store::Sample;

/// An external origin of real latency measurements.
///
/// `Ok(None)` means the source had nothing for this pair right now. Errors
/// and empty answers are never fatal: the scheduler falls back to a
/// generated sample instead.
pub trait MeasurementSource: Send + Sync {
    /// Measure the round trip from `from` to `to`
    fn measure(&self, from: &Endpoint, to: &Endpoint) -> Result<Option<Sample>>;
}


#[cfg(test)]
pub use tests::MockMeasurementSource;
