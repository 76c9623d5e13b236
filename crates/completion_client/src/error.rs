//! Completion client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned {status}: {message}")]
    Service { status: u16, message: String },

    /// The service answered but produced no usable text.
    #[error("completion response carried no content")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, CompletionError>;
