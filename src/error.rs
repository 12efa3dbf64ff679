//! Error types for the veloz crate

use thiserror::Error;

/// Result type alias for veloz operations
pub type Result<T> = std::result::Result<T, VelozError>;

/// Main error type for training, inference, and persistence
#[derive(Error, Debug)]
pub enum VelozError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Invalid model format: {0}")]
    FormatError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
