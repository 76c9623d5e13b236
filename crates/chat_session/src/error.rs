//! Chat session error types

use thiserror::Error;

/// Rejections of a `send` call. These are the only errors the session
/// surfaces; transport failures become the scripted fallback reply.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a reply is already pending")]
    ReplyPending,
}

pub type Result<T> = std::result::Result<T, ChatError>;
