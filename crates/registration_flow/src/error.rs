//! Account/flow error types
//!
//! Every variant's display text is the string shown to the user; form
//! handlers render `err.to_string()` directly.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("This email is already registered. Please sign in instead.")]
    EmailAlreadyRegistered,

    /// Provider rejection passed through verbatim (wrong credentials,
    /// weak password, ...), or a scripted fallback for transport errors.
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to create profile: {0}")]
    Profile(String),

    #[error("Failed to resend: {0}")]
    Resend(String),
}

pub type Result<T> = std::result::Result<T, AccountError>;
