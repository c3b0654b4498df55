//! Server configuration module
//!
//! Provides CLI argument parsing and validation for the latency query server.

use crate::error::{Result, TopologyError};
use clap::Parser;
use std::time::Duration;
use tracing::debug;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Parser, Debug, Clone)]
#[command(name = "latency-topology-server")]
#[command(about = "Serves simulated exchange-to-exchange latency history over HTTP")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Bind port
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Milliseconds between ingestion ticks
    #[arg(long, default_value_t = 7000)]
    pub tick_interval_ms: u64,

    /// Pair draws per ingestion tick
    #[arg(long, default_value_t = 10)]
    pub pairs_per_tick: usize,

    /// Seed for the sample generator and pair selection
    #[arg(long, default_value_t = crate::generator::DEFAULT_SEED)]
    pub seed: u64,

    /// Monitor update interval in milliseconds
    #[arg(long, default_value_t = 250)]
    pub update_interval: u64,

    /// Disable terminal UI (useful for Docker/systemd/non-interactive environments)
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl ServerConfig {
    /// Returns the full bind address as a string (bind:port)
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating server configuration");

        if self.port == 0 {
            return Err(TopologyError::Config("port must be > 0".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(TopologyError::Config("tick_interval_ms must be > 0".into()));
        }
        if self.pairs_per_tick == 0 {
            return Err(TopologyError::Config("pairs_per_tick must be > 0".into()));
        }
        if self.update_interval == 0 {
            return Err(TopologyError::Config("update_interval must be > 0".into()));
        }
        validate_log_level(&self.log_level)?;

        debug!("Server configuration validated successfully");
        Ok(())
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

pub(crate) fn validate_log_level(level: &str) -> Result<()> {
    if VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(TopologyError::Config(format!(
            "log_level must be one of: {}",
            VALID_LOG_LEVELS.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig::parse_from(["server"])
    }

    #[test]
    fn test_default_config() {
        let config = config();

        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.tick_interval(), Duration::from_secs(7));
        assert_eq!(config.seed, 12345);
        assert!(!config.is_json_format());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = ServerConfig::parse_from([
            "server",
            "--bind",
            "127.0.0.1",
            "--port",
            "9000",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--quiet",
        ]);

        assert_eq!(config.address(), "127.0.0.1:9000");
        assert!(config.quiet);
        assert!(config.is_json_format());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let config = ServerConfig { port: 0, ..config() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_tick_settings() {
        assert!(ServerConfig { tick_interval_ms: 0, ..config() }.validate().is_err());
        assert!(ServerConfig { pairs_per_tick: 0, ..config() }.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = ServerConfig {
            log_level: "invalid".to_string(),
            ..config()
        };
        assert!(config.validate().is_err());
    }
}
