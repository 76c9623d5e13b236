//! chat_session - The chat widget's conversation state
//!
//! Owns the append-only transcript and mediates one-at-a-time exchanges
//! with the completion service. External persistence, when wired in, is a
//! best-effort mirror; the in-memory transcript stays the source of truth.

pub mod error;
pub mod session;

pub use error::{ChatError, Result};
pub use session::{ChatSession, FALLBACK_REPLY};
