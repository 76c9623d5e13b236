//! The verification flow driver
//!
//! Owns the registration state machine and the four confirmation
//! detection channels. The machine is the single authoritative state
//! holder; every channel goes through `try_advance`, which checks the
//! armed state under the write lock, so a late or duplicate observation
//! is a silent no-op.

use identity_client::{AuthEvent, IdentityProvider};
use registration_state::{ConfirmationSource, RegistrationStep, StateMachine, VerificationEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use community_core::Config;

use crate::fragment::parse_signup_fragment;

/// Result of the initial page-load check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOutcome {
    /// When a signup token was found, the URL the shell must put in the
    /// address bar in place of the current one (replace, not navigate).
    pub stripped_url: Option<String>,
    pub step: RegistrationStep,
}

struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives the three-phase signup UX against asynchronous confirmation
/// signals.
pub struct VerificationFlow {
    identity: Arc<dyn IdentityProvider>,
    machine: RwLock<StateMachine>,
    poller: Mutex<Option<PollerHandle>>,
    /// Bumped on every disarm; tasks holding an older value must drop
    /// their result instead of mutating state.
    epoch: AtomicU64,
    poll_interval: Duration,
    shutdown: CancellationToken,
}

impl VerificationFlow {
    pub fn new(identity: Arc<dyn IdentityProvider>, config: &Config) -> Self {
        Self {
            identity,
            machine: RwLock::new(StateMachine::new()),
            poller: Mutex::new(None),
            epoch: AtomicU64::new(0),
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            shutdown: CancellationToken::new(),
        }
    }

    pub async fn step(&self) -> RegistrationStep {
        self.machine.read().await.step()
    }

    pub async fn pending_email(&self) -> Option<String> {
        self.machine.read().await.pending_email().map(str::to_string)
    }

    pub async fn is_armed(&self) -> bool {
        self.machine.read().await.is_armed()
    }

    /// Enter the waiting phase after a successful signup and arm the
    /// detection channels. Re-entry while already waiting is tolerated;
    /// the poller keeps running.
    pub async fn start_waiting_for_verification(self: &Arc<Self>, email: &str) {
        let armed = {
            let mut machine = self.machine.write().await;
            machine.handle_event(VerificationEvent::SignupAccepted {
                email: email.to_string(),
            });
            machine.is_armed()
        };
        if armed {
            self.start_poller().await;
        }
    }

    /// Cancel/close: back to the form, channels disarmed. Any in-flight
    /// status check becomes stale via the epoch bump.
    pub async fn reset_verification(&self) {
        self.machine
            .write()
            .await
            .handle_event(VerificationEvent::FlowReset);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.stop_poller().await;
    }

    /// The user dismissed the success screen.
    pub async fn dismiss_success(&self) {
        self.machine
            .write()
            .await
            .handle_event(VerificationEvent::SuccessDismissed);
    }

    /// Component teardown: stop the poller and the event listener.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.stop_poller().await;
    }

    /// Channel 1: an auth-state notification. Only a sign-in that
    /// carries a confirmation timestamp counts, and only while armed,
    /// so unrelated sign-ins are ignored.
    pub async fn handle_auth_event(&self, event: &AuthEvent) -> bool {
        match event {
            AuthEvent::SignedIn {
                confirmed_at: Some(_),
                ..
            } => self.try_advance(ConfirmationSource::AuthEvent).await,
            _ => false,
        }
    }

    /// Spawn the task feeding channel 1 from the provider's event bus.
    /// Lives until `shutdown`; arming is checked per event.
    pub fn spawn_event_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let flow = Arc::clone(self);
        let mut events = flow.identity.subscribe_events();
        let shutdown = flow.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    event = events.recv() => match event {
                        Ok(event) => {
                            flow.handle_auth_event(&event).await;
                        }
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            warn!(missed, "auth event listener lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        })
    }

    /// Channel 2: the page regained foreground visibility; issue a
    /// one-shot status fetch while armed.
    pub async fn visibility_regained(&self) -> bool {
        if !self.is_armed().await {
            return false;
        }
        self.check_status_once(ConfirmationSource::VisibilityRecheck)
            .await
    }

    /// Channel 4: inspect the page URL on initial load. A signup token
    /// is adopted and checked immediately; a confirmed status jumps
    /// straight to success without ever visiting the waiting phase.
    pub async fn attach_from_page_url(self: &Arc<Self>, page_url: &str) -> MountOutcome {
        let Some(token) = parse_signup_fragment(page_url) else {
            return MountOutcome {
                stripped_url: None,
                step: self.step().await,
            };
        };

        info!("signup token found in page URL");
        self.identity.adopt_access_token(&token.access_token).await;

        match self.identity.session_status().await {
            Ok(status) if status.is_confirmed() => {
                self.try_advance(ConfirmationSource::FragmentToken).await;
            }
            Ok(status) => {
                // Token present but not confirmed yet: arm the regular
                // channels under whatever address the session reports.
                let email = status.email.unwrap_or_default();
                self.start_waiting_for_verification(&email).await;
            }
            Err(err) => {
                warn!(error = %err, "status check for URL token failed");
                self.start_waiting_for_verification("").await;
            }
        }

        MountOutcome {
            stripped_url: Some(token.stripped_url),
            step: self.step().await,
        }
    }

    /// One-shot status fetch shared by the visibility and polling
    /// channels. Failures are logged and swallowed; the next cycle
    /// retries.
    async fn check_status_once(&self, source: ConfirmationSource) -> bool {
        let epoch = self.epoch.load(Ordering::SeqCst);

        match self.identity.session_status().await {
            Ok(status) if status.is_confirmed() => {
                if self.epoch.load(Ordering::SeqCst) != epoch {
                    debug!(source = source.as_str(), "stale status result dropped");
                    return false;
                }
                self.try_advance(source).await
            }
            Ok(_) => false,
            Err(err) => {
                warn!(source = source.as_str(), error = %err, "status check failed");
                false
            }
        }
    }

    /// The one-way compare-and-set every channel funnels through. Holds
    /// the write lock across the armed check and the transition so two
    /// channels cannot both observe "armed" and both advance.
    async fn try_advance(&self, source: ConfirmationSource) -> bool {
        let changed = {
            let mut machine = self.machine.write().await;
            // Channels 1-3 require the armed (waiting) state; only the
            // URL-token path may confirm straight from the form.
            if !machine.is_armed() && source != ConfirmationSource::FragmentToken {
                return false;
            }
            machine
                .handle_event(VerificationEvent::ConfirmationObserved { source })
                .changed
        };

        if changed {
            info!(source = source.as_str(), "email confirmation detected");
            self.epoch.fetch_add(1, Ordering::SeqCst);
            self.stop_poller().await;
        }
        changed
    }

    /// Channel 3: the fixed-interval poll. One task at a time; stops on
    /// cancellation or as soon as the flow is no longer armed.
    async fn start_poller(self: &Arc<Self>) {
        let mut guard = self.poller.lock().await;
        if guard.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let task = {
            let flow = Arc::clone(self);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(flow.poll_interval);
                // The first tick of an interval fires immediately; the
                // first check should happen one interval after arming.
                ticker.tick().await;
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = ticker.tick() => {
                            if !flow.is_armed().await {
                                break;
                            }
                            flow.check_status_once(ConfirmationSource::Poll).await;
                        }
                    }
                }
            })
        };

        *guard = Some(PollerHandle { cancel, task });
    }

    async fn stop_poller(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.cancel.cancel();
            // The task exits on its next select pass; detaching is
            // enough since stale results are epoch-guarded.
            drop(handle.task);
        }
    }
}
