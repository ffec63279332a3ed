//! CLI error types

use thiserror::Error;

use pricer_core::types::{PricingError, StudyError};

/// Errors surfaced to the command line
#[derive(Debug, Error)]
pub enum CliError {
    /// An argument value is not accepted
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Pricing failed
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The batch study failed
    #[error(transparent)]
    Study(#[from] StudyError),

    /// Output could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialised
    #[error("Serialisation error: {0}")]
    Serialisation(String),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialisation(e.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        Self::Serialisation(e.to_string())
    }
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
