use crate::error::Result;
use crate::hub::LatencyHub;
use crate::simulate::constants::{ACCEPTABLE_RTT_MS, FAST_RTT_MS};
use crate::simulate::distribution::Distribution;
use crate::simulate::run::SimulationResult;
use crate::store::{compute_stats, PairKey, Sample};
use colored::*;
use tracing::debug;

const BAR_WIDTH: usize = 30;

/// RTT buckets, lower bound inclusive, in milliseconds
const BUCKETS: [(u32, u32, &str); 8] = [
    (0, 25, "0-25 ms"),
    (25, 50, "25-50 ms"),
    (50, 75, "50-75 ms"),
    (75, 100, "75-100 ms"),
    (100, 125, "100-125 ms"),
    (125, 150, "125-150 ms"),
    (150, 175, "150-175 ms"),
    (175, u32::MAX, ">175 ms"),
];

/// Prints simulation results to the terminal
pub struct Reporter;

impl Reporter {
    /// Pairs with the most stored samples, ties in pair order
    pub fn busiest_pairs(hub: &LatencyHub, top: usize) -> Vec<PairKey> {
        let mut pairs: Vec<(PairKey, usize)> = hub
            .store()
            .pairs()
            .into_iter()
            .map(|pair| {
                let len = hub.store().partition_len(&pair.from, &pair.to);
                (pair, len)
            })
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs.into_iter().take(top).map(|(pair, _)| pair).collect()
    }

    /// Count samples per entry of [`BUCKETS`]
    fn bucket_counts(samples: &[Sample]) -> [usize; BUCKETS.len()] {
        let mut counts = [0usize; BUCKETS.len()];
        for sample in samples {
            if let Some(i) = BUCKETS
                .iter()
                .position(|&(lo, hi, _)| sample.rtt_ms >= lo && sample.rtt_ms < hi)
            {
                counts[i] += 1;
            }
        }
        counts
    }

    /// Full blocks scaled to the largest bucket; a sliver for tiny non-zero counts
    fn render_bar(count: usize, max_count: usize, width: usize) -> String {
        if count == 0 || max_count == 0 {
            return String::new();
        }
        let len = count * width / max_count;
        if len == 0 {
            "▏".to_string()
        } else {
            "█".repeat(len)
        }
    }

    fn colorize_mean(mean: f64) -> ColoredString {
        let text = format!("{:.1} ms", mean);
        if mean < FAST_RTT_MS {
            text.green()
        } else if mean < ACCEPTABLE_RTT_MS {
            text.yellow()
        } else {
            text.red()
        }
    }

    pub fn print_summary(&self, result: &SimulationResult, hub: &LatencyHub) {
        println!("\n{}", "┌─────────────────────────────┐".cyan());
        println!("{}", "│  Latency Topology Results   │".cyan());
        println!("{}", "└─────────────────────────────┘".cyan());
        println!();
        println!(
            "Ticks:    {} in {:.2}s",
            result.ticks,
            result.elapsed.as_secs_f64()
        );
        println!(
            "Samples:  {} seeded, {} ingested, {} purged, {} stored",
            result.seeded,
            result.inserted,
            result.purged,
            hub.store().total_samples()
        );
        if result.from_source > 0 || result.fallbacks > 0 {
            println!(
                "Sources:  {} replayed, {} generated as fallback",
                result.from_source, result.fallbacks
            );
        }
        println!("Pairs:    {}", hub.store().pairs().len());
        println!();
    }

    /// Stats, percentiles and RTT buckets for one pair
    pub fn print_pair(&self, hub: &LatencyHub, pair: &PairKey) -> Result<()> {
        let samples = hub.query(&pair.from, &pair.to, None, None);
        debug!(pair = %pair, samples = samples.len(), "Printing pair report");

        println!("{}", pair.to_string().bold());
        if samples.is_empty() {
            println!("  {}\n", "No samples recorded for this pair.".red());
            return Ok(());
        }

        let stats = compute_stats(&samples);
        let dist = Distribution::new(&samples)?;

        println!("  Count:  {:>8}", stats.count);
        println!("  Avg:    {:>8}  ({})", stats.avg, Self::colorize_mean(dist.mean()));
        println!("  Min:    {:>8} ms", stats.min);
        println!("  Max:    {:>8} ms", stats.max);
        println!("  P50:    {:>8} ms", dist.percentile(0.5));
        println!("  P90:    {:>8} ms", dist.percentile(0.9));
        println!("  P99:    {:>8} ms", dist.percentile(0.99));
        println!();

        let counts = Self::bucket_counts(&samples);
        let max_count = counts.iter().copied().max().unwrap_or(0);
        for (&(_, _, label), &count) in BUCKETS.iter().zip(counts.iter()) {
            if count == 0 {
                continue;
            }
            let pct = count as f64 / samples.len() as f64 * 100.0;
            println!(
                "  {:>12}:  {:30} {:5.1}% ({} samples)",
                label,
                Self::render_bar(count, max_count, BAR_WIDTH),
                pct,
                count
            );
        }
        println!();
        Ok(())
    }
}
