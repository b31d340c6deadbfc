use thiserror::Error;

pub type AdScaleResult<T> = Result<T, AdScaleError>;

#[derive(Error, Debug)]
pub enum AdScaleError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Unknown campaign objective: {0}")]
    UnknownObjective(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
