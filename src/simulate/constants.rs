//! Constants for the simulation report

/// Histogram lower bound in milliseconds
pub const HISTOGRAM_LOW_BOUND_MS: u64 = 1;

/// Histogram upper bound in milliseconds
pub const HISTOGRAM_HIGH_BOUND_MS: u64 = 60_000;

/// Histogram significant digits for precision
pub const HISTOGRAM_SIGNIFICANT_DIGITS: u8 = 3;

/// Progress bar tick interval in milliseconds
pub const PROGRESS_TICK_INTERVAL_MS: u64 = 100;

/// Mean RTT under this is reported as fast
pub const FAST_RTT_MS: f64 = 75.0;

/// Mean RTT under this is reported as acceptable
pub const ACCEPTABLE_RTT_MS: f64 = 125.0;
