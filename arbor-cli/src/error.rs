//! Error types

use thiserror::Error;

/// Viewer error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid log level: {0}")]
    LogLevel(String),
    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Data(#[from] arbor_data::DataError),
    #[error(transparent)]
    Tree(#[from] arbor::TreeError),
}
