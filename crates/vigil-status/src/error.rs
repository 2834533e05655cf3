//! Status backend error types.

use thiserror::Error;

/// Errors raised while talking to a status backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Severity(#[from] vigil_core::UnknownSeverity),
}

pub type BackendResult<T> = Result<T, BackendError>;
