//! identity_client - Client for the hosted identity provider
//!
//! Wraps the provider's REST auth endpoints (signup, password sign-in,
//! session status, confirmation resend, sign-out) behind the
//! `IdentityProvider` trait and broadcasts auth-state events so other
//! components can react to sign-ins without holding a reference to the
//! caller.

pub mod api;
pub mod error;
pub mod events;
pub mod provider;

pub use api::client::HttpIdentityProvider;
pub use api::models::SessionStatus;
pub use error::{IdentityError, Result};
pub use events::AuthEvent;
pub use provider::IdentityProvider;
