use anyhow::{Context, Result};
use clap::Parser;
use latency_topology::simulate::{run_simulation, Reporter, SimulateConfig};
use latency_topology::{init_logging_with_config, PairKey};
use tracing::error;

fn main() {
    let config = SimulateConfig::parse();

    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        error!(error = %e, "Simulation failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(config: &SimulateConfig) -> Result<()> {
    let (hub, result) = run_simulation(config).context("Simulation did not complete")?;

    let reporter = Reporter;
    reporter.print_summary(&result, &hub);

    let pairs = match config.pair() {
        Some((from, to)) => vec![PairKey::new(from, to)],
        None => Reporter::busiest_pairs(&hub, config.top),
    };
    for pair in &pairs {
        reporter.print_pair(&hub, pair)?;
    }
    Ok(())
}
