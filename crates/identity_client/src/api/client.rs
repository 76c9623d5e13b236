use community_core::Config;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::models::{
    CredentialsRequest, ErrorBody, ResendRequest, SessionStatus, SignUpResponse, TokenResponse,
};
use crate::error::{IdentityError, Result};
use crate::events::AuthEvent;
use crate::provider::IdentityProvider;

use async_trait::async_trait;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// HTTP implementation of [`IdentityProvider`].
///
/// Holds at most one session token at a time; the token is replaced on
/// sign-in, adopted from a URL token on the fragment path, and dropped on
/// sign-out.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    access_token: RwLock<Option<String>>,
    events: broadcast::Sender<AuthEvent>,
}

impl HttpIdentityProvider {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.identity_base_url, &config.identity_anon_key)
    }

    pub fn with_base_url(base_url: &str, anon_key: &str) -> Self {
        let client = Client::builder()
            .default_headers(Self::default_headers(anon_key))
            .build()
            .unwrap_or_default();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: RwLock::new(None),
            events,
        }
    }

    fn default_headers(anon_key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = anon_key.parse() {
            headers.insert("apikey", value);
        }
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to an error, reading whichever message
    /// field the provider chose to populate.
    async fn error_for(response: Response, fallback: &str) -> IdentityError {
        let status = response.status();
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.into_message(fallback);

        if status == StatusCode::BAD_REQUEST
            || status == StatusCode::UNPROCESSABLE_ENTITY
            || status == StatusCode::UNAUTHORIZED
        {
            IdentityError::Rejected(message)
        } else {
            IdentityError::Service {
                status: status.as_u16(),
                message,
            }
        }
    }

    fn publish(&self, event: AuthEvent) {
        // A send error only means nobody is subscribed right now.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Uuid> {
        let response = self
            .client
            .post(self.url("/auth/v1/signup"))
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, "Registration failed. Please try again.").await);
        }

        let body: SignUpResponse = response.json().await?;

        // Some deployments hand out a session right at signup; keep the
        // token so status polls can see the confirmation land.
        if let Some(token) = &body.access_token {
            *self.access_token.write().await = Some(token.clone());
        }

        body.user_id()
            .ok_or_else(|| IdentityError::Rejected("Registration failed. Please try again.".to_string()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Uuid> {
        let response = self
            .client
            .post(self.url("/auth/v1/token?grant_type=password"))
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, "Sign in failed. Please try again.").await);
        }

        let body: TokenResponse = response.json().await?;
        *self.access_token.write().await = Some(body.access_token);

        self.publish(AuthEvent::SignedIn {
            user_id: body.user.id,
            email: body.user.email.clone().unwrap_or_default(),
            confirmed_at: body.user.email_confirmed_at,
        });

        Ok(body.user.id)
    }

    async fn session_status(&self) -> Result<SessionStatus> {
        let token = self.access_token.read().await.clone();
        let Some(token) = token else {
            debug!("session status requested without a session");
            return Ok(SessionStatus::default());
        };

        let response = self
            .client
            .get(self.url("/auth/v1/user"))
            .bearer_auth(&token)
            .send()
            .await?;

        // An expired or not-yet-confirmed token reads as "no session",
        // not as a failure; the next cycle simply checks again.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(SessionStatus::default());
        }
        if !response.status().is_success() {
            return Err(Self::error_for(response, "Status check failed.").await);
        }

        let user: crate::api::models::ApiUser = response.json().await?;
        Ok(SessionStatus {
            email: user.email,
            confirmed_at: user.email_confirmed_at,
        })
    }

    async fn resend_confirmation(&self, email: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/auth/v1/resend"))
            .json(&ResendRequest {
                kind: "signup".to_string(),
                email: email.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, "Failed to resend email").await);
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        let token = self.access_token.read().await.clone();
        let Some(token) = token else {
            // Nothing to end; treat as already signed out.
            self.publish(AuthEvent::SignedOut);
            return Ok(());
        };

        let response = self
            .client
            .post(self.url("/auth/v1/logout"))
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "sign-out rejected by provider");
            return Err(Self::error_for(response, "Logout failed").await);
        }

        *self.access_token.write().await = None;
        self.publish(AuthEvent::SignedOut);
        Ok(())
    }

    async fn adopt_access_token(&self, token: &str) {
        *self.access_token.write().await = Some(token.to_string());
    }

    fn subscribe_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
