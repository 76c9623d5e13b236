use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::api::models::SessionStatus;
use crate::error::Result;
use crate::events::AuthEvent;

/// Contract with the hosted identity provider.
///
/// Implemented by the HTTP client and by test stubs; everything above
/// this seam is exercised without a network.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. The address stays unconfirmed until the user
    /// acts on the verification email.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Uuid>;

    /// Password sign-in.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Uuid>;

    /// One-shot confirmation-status fetch for the current session.
    /// Reports unconfirmed (not an error) when no session is held.
    async fn session_status(&self) -> Result<SessionStatus>;

    /// Re-trigger delivery of the confirmation email.
    async fn resend_confirmation(&self, email: &str) -> Result<()>;

    /// End the current session.
    async fn sign_out(&self) -> Result<()>;

    /// Take over a session from an access token carried in a page URL.
    async fn adopt_access_token(&self, token: &str);

    /// Subscribe to asynchronous auth-state notifications.
    fn subscribe_events(&self) -> broadcast::Receiver<AuthEvent>;
}
