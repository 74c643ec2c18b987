//! Error types for prune

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PruneError {
    /// Bad operator input: dates, sample rates, table identifiers.
    /// Raised before any statement reaches the database.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("execution failure: {0}")]
    ExecutionFailure(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl PruneError {
    /// Stable machine-readable code for robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::ExecutionFailure(_) => "execution_failure",
            Self::Config(_) => "config",
            Self::MissingConfig(_) => "missing_config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PruneError>;
