//! The account session: sign-up, sign-in, sign-out, resend
//!
//! Owns the signed-in user. Sign-out is a pending/confirmed transaction:
//! the user is only cleared once the provider confirms, and restored
//! (nothing to restore, nothing was touched) when it fails, so the UI
//! never shows a signed-out state the server disagrees with.

use community_core::{Profile, RegistrationData, SignInData, User};
use identity_client::{AuthEvent, IdentityError, IdentityProvider};
use message_store::{CommunityStore, StoreError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::error::{AccountError, Result};

#[derive(Default)]
struct AccountState {
    user: Option<User>,
    signing_out: bool,
}

pub struct AccountSession {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn CommunityStore>,
    state: RwLock<AccountState>,
}

impl AccountSession {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn CommunityStore>) -> Self {
        Self {
            identity,
            profiles,
            state: RwLock::new(AccountState::default()),
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_signing_out(&self) -> bool {
        self.state.read().await.signing_out
    }

    /// Register a new account. On success the caller hands the returned
    /// email to the verification flow.
    pub async fn sign_up(&self, data: &RegistrationData) -> Result<String> {
        // Duplicate pre-check against the stored profiles. A failed
        // lookup is not a reason to block registration; the provider
        // enforces uniqueness as the backstop.
        match self.profiles.find_profile_by_email(&data.email).await {
            Ok(Some(_)) => return Err(AccountError::EmailAlreadyRegistered),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "duplicate-email pre-check failed"),
        }

        let user_id = self
            .identity
            .sign_up(&data.email, &data.password)
            .await
            .map_err(|err| match err {
                IdentityError::Rejected(message)
                    if message.contains("already registered")
                        || message.contains("already been registered") =>
                {
                    AccountError::EmailAlreadyRegistered
                }
                IdentityError::Rejected(message) => AccountError::Rejected(message),
                other => {
                    warn!(error = %other, "signup transport failure");
                    AccountError::Rejected("Registration failed. Please try again.".to_string())
                }
            })?;

        self.create_profile_if_missing(user_id, data).await?;

        Ok(data.email.clone())
    }

    /// Create the profile row unless an interrupted registration already
    /// did; a concurrent insert losing the race is fine too.
    async fn create_profile_if_missing(&self, user_id: Uuid, data: &RegistrationData) -> Result<()> {
        match self.profiles.find_profile(user_id).await {
            Ok(Some(_)) => return Ok(()),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "profile existence check failed"),
        }

        let profile = Profile {
            id: user_id,
            email: data.email.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            user_type: data.user_type.clone(),
            school: data.school.clone(),
        };

        match self.profiles.create_profile(&profile).await {
            Ok(()) | Err(StoreError::Conflict(_)) => Ok(()),
            Err(err) => Err(AccountError::Profile(err.to_string())),
        }
    }

    pub async fn sign_in(&self, data: &SignInData) -> Result<User> {
        let user_id = self
            .identity
            .sign_in(&data.email, &data.password)
            .await
            .map_err(|err| match err {
                IdentityError::Rejected(message) => AccountError::Rejected(message),
                other => {
                    warn!(error = %other, "sign-in transport failure");
                    AccountError::Rejected("Sign in failed. Please try again.".to_string())
                }
            })?;

        let user = self.build_user(user_id, &data.email).await;
        self.state.write().await.user = Some(user.clone());
        Ok(user)
    }

    /// Transactional sign-out: mark pending, then commit or roll back on
    /// the provider's answer.
    pub async fn sign_out(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if state.signing_out {
                return Ok(());
            }
            state.signing_out = true;
        }

        let result = self.identity.sign_out().await;

        let mut state = self.state.write().await;
        state.signing_out = false;
        match result {
            Ok(()) => {
                state.user = None;
                Ok(())
            }
            Err(err) => {
                // Roll back: the server still considers the session
                // active, so the user stays signed in.
                let message = match err {
                    IdentityError::Rejected(message) => message,
                    other => {
                        warn!(error = %other, "sign-out transport failure");
                        "Logout failed".to_string()
                    }
                };
                Err(AccountError::Rejected(message))
            }
        }
    }

    /// Re-trigger delivery of the confirmation email. Never changes the
    /// verification step.
    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        self.identity
            .resend_confirmation(email)
            .await
            .map_err(|err| AccountError::Resend(err.to_string()))
    }

    /// Mirror provider-side auth changes into the session, e.g. the
    /// sign-in the provider reports after an email confirmation.
    pub async fn apply_auth_event(&self, event: &AuthEvent) {
        match event {
            AuthEvent::SignedIn { user_id, email, .. } => {
                let user = self.build_user(*user_id, email).await;
                self.state.write().await.user = Some(user);
            }
            AuthEvent::SignedOut => {
                self.state.write().await.user = None;
            }
        }
    }

    async fn build_user(&self, user_id: Uuid, email: &str) -> User {
        let profile = match self.profiles.find_profile(user_id).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(error = %err, "profile lookup failed");
                None
            }
        };

        match profile {
            Some(profile) => User {
                id: user_id,
                email: profile.email,
                first_name: profile.first_name,
                last_name: profile.last_name,
            },
            None => User {
                id: user_id,
                email: email.to_string(),
                first_name: String::new(),
                last_name: String::new(),
            },
        }
    }
}
