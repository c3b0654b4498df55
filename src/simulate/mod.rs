//! Offline simulation: drive the scheduler on a manual clock and report

pub mod config;
pub mod constants;
pub mod distribution;
pub mod progress;
pub mod reporter;
pub mod run;

pub use config::SimulateConfig;
pub use distribution::Distribution;
pub use progress::ProgressTracker;
pub use reporter::Reporter;
pub use run::{run_simulation, SimulationResult};
