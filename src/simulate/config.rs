use crate::error::{Result, TopologyError};
use crate::server::config::validate_log_level;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "latency-topology-simulate")]
#[command(about = "Runs the latency ingestion loop offline and reports per-pair statistics")]
pub struct SimulateConfig {
    /// Number of ingestion ticks to run
    #[arg(long, default_value_t = 500)]
    pub ticks: usize,

    /// Pair draws per tick
    #[arg(long, default_value_t = 10)]
    pub pairs_per_tick: usize,

    /// Seed for the sample generator and pair selection
    #[arg(long, default_value_t = crate::generator::DEFAULT_SEED)]
    pub seed: u64,

    /// Simulated milliseconds between ticks
    #[arg(long, default_value_t = 7000)]
    pub tick_spacing_ms: i64,

    /// Simulated start time in Unix milliseconds (defaults to now)
    #[arg(long)]
    pub start_ms: Option<i64>,

    /// JSON file of recorded Globalping measurements to replay
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Source endpoint id of a pair to report on
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Destination endpoint id of a pair to report on
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// How many of the busiest pairs to report when no pair is given
    #[arg(long, default_value_t = 3)]
    pub top: usize,

    /// Disable the progress bar
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl SimulateConfig {
    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating simulation configuration");
        if self.ticks == 0 {
            return Err(TopologyError::Config("ticks must be > 0".into()));
        }
        if self.pairs_per_tick == 0 {
            return Err(TopologyError::Config("pairs_per_tick must be > 0".into()));
        }
        if self.tick_spacing_ms <= 0 {
            return Err(TopologyError::Config("tick_spacing_ms must be > 0".into()));
        }
        if self.from.is_some() != self.to.is_some() {
            return Err(TopologyError::Config("--from and --to must be given together".into()));
        }
        validate_log_level(&self.log_level)?;
        Ok(())
    }

    /// The pair explicitly requested for the report, if any
    pub fn pair(&self) -> Option<(&str, &str)> {
        self.from.as_deref().zip(self.to.as_deref())
    }

    pub fn is_json_format(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulateConfig::parse_from(["simulate"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.ticks, 500);
        assert_eq!(config.pair(), None);
    }

    #[test]
    fn test_pair_selection() {
        let config = SimulateConfig::parse_from(["simulate", "--from", "srv-0", "--to", "srv-1"]);
        assert_eq!(config.pair(), Some(("srv-0", "srv-1")));
    }

    #[test]
    fn test_invalid_values() {
        let base = SimulateConfig::parse_from(["simulate"]);

        assert!(SimulateConfig { ticks: 0, ..base.clone() }.validate().is_err());
        assert!(SimulateConfig { tick_spacing_ms: 0, ..base.clone() }.validate().is_err());
        assert!(SimulateConfig {
            from: Some("srv-0".into()),
            ..base.clone()
        }
        .validate()
        .is_err());
        assert!(SimulateConfig {
            log_level: "loud".into(),
            ..base
        }
        .validate()
        .is_err());
    }
}
