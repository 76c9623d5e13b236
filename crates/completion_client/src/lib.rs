//! completion_client - Client for the remote text-completion service
//!
//! One stateless request/response call against an OpenAI-compatible
//! `/chat/completions` endpoint, no streaming. The conversation context
//! travels with every request; the service holds nothing between calls.

pub mod api;
pub mod error;
pub mod service;

pub use api::client::HttpCompletionService;
pub use error::{CompletionError, Result};
pub use service::CompletionService;
