use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    MissingParameter(String),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Measurement source error: {0}")]
    Source(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
