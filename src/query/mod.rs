//! Read-only request handlers over a [`LatencyHub`](crate::hub::LatencyHub)
//!
//! Nothing here knows about HTTP; [`crate::server::http`] routes requests to
//! these functions and turns their errors into status codes.

pub mod handler;
pub mod params;

pub use handler::{history, recent, stats, HISTORY_PATH, RECENT_PATH, STATS_PATH};
pub use params::{PairQuery, PairWindow, MISSING_PAIR_MESSAGE};
