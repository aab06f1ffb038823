//! Error types for the beneish binary.

use beneish::BeneishError;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Failure inside the detection workflow
    #[error(transparent)]
    Workflow(#[from] BeneishError),

    /// Terminal I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed dashboard command
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// Whether the dashboard keeps running after showing this error.
    pub(crate) fn is_warning(&self) -> bool {
        matches!(self, Self::Workflow(e) if e.is_warning())
    }

    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Workflow(e) => match e {
                BeneishError::Schema { .. } => ExitCode::from(3),
                BeneishError::Load { .. } => ExitCode::from(4),
                BeneishError::InvalidLabel { .. } => ExitCode::from(5),
                BeneishError::InvalidHyperparameter { .. } => ExitCode::from(2),
                BeneishError::NotReady => ExitCode::from(6),
                _ => ExitCode::from(1),
            },
            Self::Io(_) => ExitCode::from(7),
            Self::Usage(_) => ExitCode::from(2),
        }
    }
}
