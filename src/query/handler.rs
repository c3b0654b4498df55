use crate::error::Result;
use crate::hub::LatencyHub;
use crate::query::params::PairQuery;
use crate::store::{compute_stats, Sample, Stats};
use tracing::debug;

pub const HISTORY_PATH: &str = "/api/latency/history";
pub const STATS_PATH: &str = "/api/latency/stats";
pub const RECENT_PATH: &str = "/api/latency/recent";

/// Samples for the requested pair and window, oldest first
pub fn history(hub: &LatencyHub, query: &PairQuery) -> Result<Vec<Sample>> {
    let w = query.window()?;
    let samples = hub.query(&w.from, &w.to, w.from_time, w.to_time);
    debug!(from = %w.from, to = %w.to, returned = samples.len(), "History answered");
    Ok(samples)
}

/// Summary over exactly the samples [`history`] would return
pub fn stats(hub: &LatencyHub, query: &PairQuery) -> Result<Stats> {
    let w = query.window()?;
    Ok(compute_stats(&hub.query(&w.from, &w.to, w.from_time, w.to_time)))
}

/// Newest samples across every pair
pub fn recent(hub: &LatencyHub) -> Vec<Sample> {
    hub.recent()
}
