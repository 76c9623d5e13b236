//! Auth-state events broadcast by the identity client

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Asynchronous auth-state notification.
///
/// `SignedIn` fires both on a normal password sign-in and when the
/// provider establishes a session after email confirmation; subscribers
/// that only care about confirmations must check `confirmed_at`.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn {
        user_id: Uuid,
        email: String,
        confirmed_at: Option<DateTime<Utc>>,
    },
    SignedOut,
}
