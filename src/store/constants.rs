//! Retention and query bounds for the sample store

use std::time::Duration;

/// Hard cap on samples kept per directed pair
pub const MAX_SAMPLES_PER_PAIR: usize = 50_000;

/// Samples older than this are evicted
pub const RETENTION_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Maximum samples returned by a single pair query
pub const QUERY_LIMIT: usize = 10_000;

/// Samples taken from the tail of each partition for the cross-pair view
pub const RECENT_PER_PAIR: usize = 100;

/// Default size of the cross-pair recent view
pub const RECENT_LIMIT: usize = 500;
