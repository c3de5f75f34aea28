//! Shared error taxonomy for the pipeline engine.
//!
//! Every port and every scheduler step surfaces one of these variants; the
//! scheduler classifies them into the step's `StepState::error` message and
//! the CLI wrapper maps them onto an exit code.

use thiserror::Error;

/// Main error type shared across the clipcut crates.
#[derive(Error, Debug)]
pub enum ClipcutError {
    /// A step was asked to run before its dependencies completed.
    #[error("missing dependencies: {0:?}")]
    Dependency(Vec<String>),

    /// The media adapter could not open or read the input.
    #[error("media error: {0}")]
    Media(String),

    /// Cut rendering failed: non-zero exit or invalid segment list.
    #[error("transcode error: {0}")]
    Transcode(String),

    /// The semantic analyzer port failed or returned schema-invalid output.
    #[error("analysis error from {provider}: {cause}")]
    Analysis { provider: String, cause: String },

    /// Cooperative cancellation was observed at a suspension point.
    #[error("cancelled")]
    Cancelled,

    /// Progress-event consumer stopped draining for too long.
    #[error("transport stalled: no drain for {0:?}")]
    TransportStalled(std::time::Duration),

    /// User-supplied configuration was out of bounds.
    #[error("invalid configuration: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias used throughout the clipcut crates.
pub type Result<T> = std::result::Result<T, ClipcutError>;

impl ClipcutError {
    /// Maps this error to the CLI wrapper's documented exit code.
    ///
    /// `0` success is never produced here — this is only consulted on `Err`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClipcutError::Dependency(_) => 2,
            ClipcutError::Media(_) | ClipcutError::Transcode(_) => 3,
            ClipcutError::TransportStalled(_) => 4,
            ClipcutError::Cancelled => 5,
            ClipcutError::Analysis { .. }
            | ClipcutError::Validation(_)
            | ClipcutError::Io(_)
            | ClipcutError::Serialization(_)
            | ClipcutError::Internal(_) => 1,
        }
    }
}
