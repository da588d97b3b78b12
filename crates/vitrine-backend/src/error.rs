//! Error types for the storefront backend client.

use thiserror::Error;

use vitrine_core::VitrineError;

/// Errors from the storefront backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("response envelope carried no data")]
    MissingData,
}

impl From<BackendError> for VitrineError {
    fn from(err: BackendError) -> Self {
        VitrineError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::MalformedResponse(err.to_string())
    }
}
