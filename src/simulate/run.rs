use crate::clock::{Clock, ManualClock, SystemClock};
use crate::error::Result;
use crate::hub::LatencyHub;
use crate::ingest::{exchange_servers, RecordedSource, Scheduler};
use crate::simulate::config::SimulateConfig;
use crate::simulate::progress::ProgressTracker;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Totals from a completed simulation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationResult {
    pub ticks: usize,
    pub seeded: usize,
    pub inserted: usize,
    pub from_source: usize,
    pub fallbacks: usize,
    pub purged: usize,
    pub elapsed: Duration,
}

/// Build a hub on a manual clock and drive the scheduler for `config.ticks`.
///
/// The clock starts at `start_ms` (or the current wall time) and advances by
/// `tick_spacing_ms` before every tick.
pub fn run_simulation(config: &SimulateConfig) -> Result<(LatencyHub, SimulationResult)> {
    let start_ms = config.start_ms.unwrap_or_else(|| SystemClock.now_ms());
    let clock = Arc::new(ManualClock::new(start_ms));
    let hub = LatencyHub::with_clock(clock.clone(), config.seed);

    let mut scheduler = Scheduler::new(exchange_servers(), config.pairs_per_tick, config.seed);
    if let Some(path) = &config.replay {
        scheduler = scheduler.with_source(Box::new(RecordedSource::from_path(path)?));
    }

    info!(
        ticks = config.ticks,
        pairs_per_tick = config.pairs_per_tick,
        seed = config.seed,
        start_ms = start_ms,
        "Starting simulation"
    );

    let started = Instant::now();
    let mut result = SimulationResult {
        seeded: scheduler.seed_initial(&hub),
        ..SimulationResult::default()
    };

    let progress = ProgressTracker::new(config.ticks, config.quiet)?;
    for _ in 0..config.ticks {
        clock.advance(config.tick_spacing_ms);
        let report = scheduler.tick(&hub);

        result.ticks += 1;
        result.inserted += report.inserted.len();
        result.from_source += report.from_source;
        result.fallbacks += report.fallbacks;
        result.purged += report.purged;
        progress.update(&report, hub.store().total_samples());
    }
    progress.finish();
    result.elapsed = started.elapsed();

    info!(
        inserted = result.inserted,
        stored = hub.store().total_samples(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "Simulation finished"
    );
    Ok((hub, result))
}
