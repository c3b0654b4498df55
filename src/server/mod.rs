//! HTTP front door: configuration, axum routes and activity monitor

pub mod config;
pub mod error;
pub mod http;
pub mod monitor;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http::{router, AppState};
pub use monitor::{ServerCounters, ServerMonitor, ServerStats};
