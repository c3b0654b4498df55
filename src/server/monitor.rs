//! Server activity counters and status line

use colored::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Time without requests before the server is shown as idle (milliseconds).
const IDLE_THRESHOLD_MS: u64 = 2_000;

/// Monitor for request and ingestion activity.
///
/// Counters are atomics so the accept loop and the ingestion thread never
/// block on the display thread.
pub struct ServerMonitor {
    requests: Arc<AtomicU64>,
    samples_ingested: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
    start_time: Instant,
    update_interval: Duration,
}

impl ServerMonitor {
    /// Create a new server monitor with the specified update interval.
    pub fn new(update_interval_ms: u64) -> Self {
        Self {
            requests: Arc::new(AtomicU64::new(0)),
            samples_ingested: Arc::new(AtomicU64::new(0)),
            errors: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
            update_interval: Duration::from_millis(update_interval_ms),
        }
    }

    /// Get counters for use in the accept loop and the ingestion thread.
    pub fn counters(&self) -> ServerCounters {
        ServerCounters {
            requests: Arc::clone(&self.requests),
            samples_ingested: Arc::clone(&self.samples_ingested),
            errors: Arc::clone(&self.errors),
        }
    }

    /// Start the background display thread.
    ///
    /// `stored` is polled on every refresh for the current store size.
    pub fn start_display<F>(&self, stored: F)
    where
        F: Fn() -> usize + Send + 'static,
    {
        let counters = self.counters();
        let update_interval = self.update_interval;

        thread::spawn(move || {
            let mut last_requests = 0u64;
            let mut last_request_time = Instant::now();

            loop {
                thread::sleep(update_interval);

                let snapshot = counters.snapshot();
                let now = Instant::now();
                if snapshot.requests > last_requests {
                    last_request_time = now;
                }
                let is_idle = now.duration_since(last_request_time)
                    >= Duration::from_millis(IDLE_THRESHOLD_MS);

                Self::display_status_line(is_idle, &snapshot, stored());
                last_requests = snapshot.requests;
            }
        });
    }

    fn render_indicator(is_idle: bool) -> String {
        if is_idle {
            "░".normal().to_string()
        } else {
            "█".green().bold().to_string()
        }
    }

    fn display_status_line(is_idle: bool, snapshot: &ServerStats, stored: usize) {
        let status = if is_idle { "IDLE" } else { "ACTIVE" };
        print!(
            "\r{} [{}] Requests: {} | Ingested: {} | Stored: {} | Errors: {}",
            Self::render_indicator(is_idle),
            status,
            snapshot.requests,
            snapshot.samples_ingested,
            stored,
            snapshot.errors
        );
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }

    /// Get final statistics.
    pub fn stats(&self) -> ServerStats {
        ServerStats {
            elapsed: self.start_time.elapsed(),
            ..self.counters().snapshot()
        }
    }
}

/// Lightweight handles for bumping the monitor's counters.
#[derive(Clone)]
pub struct ServerCounters {
    requests: Arc<AtomicU64>,
    samples_ingested: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
}

impl ServerCounters {
    #[inline]
    pub fn increment_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_ingested(&self, samples: usize) {
        self.samples_ingested.fetch_add(samples as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ServerStats {
        ServerStats {
            requests: self.requests.load(Ordering::Relaxed),
            samples_ingested: self.samples_ingested.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            elapsed: Duration::ZERO,
        }
    }
}

/// Final server statistics.
#[derive(Debug, Clone)]
pub struct ServerStats {
    pub requests: u64,
    pub samples_ingested: u64,
    pub errors: u64,
    pub elapsed: Duration,
}
