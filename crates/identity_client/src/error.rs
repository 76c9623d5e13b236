//! Identity client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the submitted data; the message is suitable
    /// for showing to the user (wrong credentials, duplicate email, ...).
    #[error("{0}")]
    Rejected(String),

    #[error("identity service returned {status}: {message}")]
    Service { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, IdentityError>;
