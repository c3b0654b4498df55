use crate::error::{Result, TopologyError};
use crate::ingest::TickReport;
use crate::simulate::constants::PROGRESS_TICK_INTERVAL_MS;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over simulation ticks with a one-line live summary
pub struct ProgressTracker {
    pb: ProgressBar,
}

impl ProgressTracker {
    /// A visible bar over `ticks`, or a hidden one when `quiet`
    pub fn new(ticks: usize, quiet: bool) -> Result<Self> {
        if quiet {
            return Ok(Self {
                pb: ProgressBar::hidden(),
            });
        }

        let pb = ProgressBar::new(ticks as u64);
        pb.set_style(
            ProgressStyle::with_template("{msg}\n{bar:40.cyan/blue} {pos:>7}/{len:7} [{elapsed_precise}]")
                .map_err(|e| TopologyError::Report(format!("Failed to create progress style: {}", e)))?
                .progress_chars("█░"),
        );
        pb.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_INTERVAL_MS));
        Ok(Self { pb })
    }

    pub fn update(&self, report: &TickReport, stored: usize) {
        self.pb.inc(1);
        let last_rtt = report.inserted.last().map_or(0, |s| s.rtt_ms);
        self.pb.set_message(format!(
            "Tick: +{} samples (last {} ms) | Stored: {}",
            report.inserted.len(),
            last_rtt,
            stored
        ));
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
