use anyhow::{Context, Result};
use clap::Parser;
use latency_topology::ingest::{exchange_servers, Scheduler};
use latency_topology::server::{router, ServerConfig, ServerCounters, ServerMonitor};
use latency_topology::{init_logging_with_config, LatencyHub, SystemClock};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let config = ServerConfig::parse();

    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Server failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Seed the hub, then tick the scheduler on a fixed interval
fn spawn_ingestion(config: &ServerConfig, hub: Arc<LatencyHub>, counters: ServerCounters) {
    let mut scheduler = Scheduler::new(exchange_servers(), config.pairs_per_tick, config.seed);
    let period = config.tick_interval();

    tokio::spawn(async move {
        counters.add_ingested(scheduler.seed_initial(&hub));

        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let report = scheduler.tick(&hub);
            counters.add_ingested(report.inserted.len());
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

async fn run(config: ServerConfig) -> Result<()> {
    let addr = config.address();

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            anyhow::anyhow!(
                "Failed to bind to {}: Address already in use. Try a different port or ensure no other process is using it.",
                addr
            )
        } else {
            anyhow::Error::new(e).context(format!("Failed to bind to {}", addr))
        }
    })?;

    let hub = Arc::new(LatencyHub::with_clock(Arc::new(SystemClock), config.seed));
    let monitor = ServerMonitor::new(config.update_interval);
    let counters = monitor.counters();

    spawn_ingestion(&config, Arc::clone(&hub), counters.clone());

    info!(
        address = %addr,
        tick_interval_ms = config.tick_interval_ms,
        pairs_per_tick = config.pairs_per_tick,
        seed = config.seed,
        "Latency topology server listening"
    );

    if !config.quiet {
        let hub = Arc::clone(&hub);
        monitor.start_display(move || hub.store().total_samples());
    } else {
        info!("Running in quiet mode (terminal UI disabled)");
    }

    axum::serve(listener, router(hub, counters))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let stats = monitor.stats();
    info!(
        requests = stats.requests,
        samples_ingested = stats.samples_ingested,
        errors = stats.errors,
        uptime_secs = stats.elapsed.as_secs(),
        "Server stopped"
    );
    Ok(())
}
