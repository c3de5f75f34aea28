//! Error types for the semantic analyzer port.
//!
//! Every variant here is collapsed into `clipcut_core::ClipcutError::Analysis`
//! at the port boundary, so callers outside this crate only ever see the
//! shared `{provider, cause}` shape from §7.

use thiserror::Error;

/// Errors a `SemanticAnalyzer` implementation can raise.
#[derive(Debug, Error)]
pub enum AiError {
    /// The transport (HTTP, in-process) failed before a response was formed.
    #[error("transport error calling {provider}: {source}")]
    Transport {
        provider: String,
        source: reqwest::Error,
    },

    /// A response was received but failed schema validation.
    #[error("{provider} returned schema-invalid output: {detail}")]
    SchemaInvalid { provider: String, detail: String },

    /// The provider returned a non-success status code.
    #[error("{provider} responded with status {status}")]
    BadStatus { provider: String, status: u16 },
}

impl AiError {
    pub fn provider(&self) -> &str {
        match self {
            AiError::Transport { provider, .. } => provider,
            AiError::SchemaInvalid { provider, .. } => provider,
            AiError::BadStatus { provider, .. } => provider,
        }
    }
}

impl From<AiError> for clipcut_core::ClipcutError {
    fn from(err: AiError) -> Self {
        clipcut_core::ClipcutError::Analysis {
            provider: err.provider().to_string(),
            cause: err.to_string(),
        }
    }
}

pub type AiResult<T> = std::result::Result<T, AiError>;
