//! Ingestion: endpoint catalog, measurement sources and the tick scheduler

pub mod endpoint;
pub mod globalping;
pub mod replay;
pub mod scheduler;
pub mod source;

pub use endpoint::{exchange_servers, Endpoint, Provider};
pub use replay::{RecordedSource, Recording};
pub use scheduler::{Origin, Scheduler, TickReport};
pub use source::MeasurementSource;
