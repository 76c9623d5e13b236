//! Integration tests for the verification flow and its four channels

use async_trait::async_trait;
use chrono::Utc;
use community_core::Config;
use identity_client::{AuthEvent, IdentityError, IdentityProvider, SessionStatus};
use registration_flow::VerificationFlow;
use registration_state::RegistrationStep;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, Notify};
use uuid::Uuid;

#[derive(Clone)]
enum Reply {
    Status(SessionStatus),
    Error,
}

/// Scriptable identity provider: the test decides what every status
/// fetch reports, and can hold one fetch in flight to model a slow
/// network round-trip.
struct ScriptedIdentity {
    reply: Mutex<Reply>,
    status_entered: AtomicUsize,
    block_status: AtomicBool,
    gate: Notify,
    adopted: Mutex<Option<String>>,
    events: broadcast::Sender<AuthEvent>,
}

impl ScriptedIdentity {
    fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            reply: Mutex::new(Reply::Status(SessionStatus::default())),
            status_entered: AtomicUsize::new(0),
            block_status: AtomicBool::new(false),
            gate: Notify::new(),
            adopted: Mutex::new(None),
            events,
        })
    }

    async fn set_reply(&self, reply: Reply) {
        *self.reply.lock().await = reply;
    }

    fn confirmed() -> SessionStatus {
        SessionStatus {
            email: Some("user@example.com".to_string()),
            confirmed_at: Some(Utc::now()),
        }
    }

    fn emit(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentity {
    async fn sign_up(&self, _email: &str, _password: &str) -> identity_client::Result<Uuid> {
        Ok(Uuid::new_v4())
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> identity_client::Result<Uuid> {
        Ok(Uuid::new_v4())
    }

    async fn session_status(&self) -> identity_client::Result<SessionStatus> {
        self.status_entered.fetch_add(1, Ordering::SeqCst);
        if self.block_status.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        match self.reply.lock().await.clone() {
            Reply::Status(status) => Ok(status),
            Reply::Error => Err(IdentityError::Service {
                status: 500,
                message: "status endpoint down".to_string(),
            }),
        }
    }

    async fn resend_confirmation(&self, _email: &str) -> identity_client::Result<()> {
        Ok(())
    }

    async fn sign_out(&self) -> identity_client::Result<()> {
        Ok(())
    }

    async fn adopt_access_token(&self, token: &str) {
        *self.adopted.lock().await = Some(token.to_string());
    }

    fn subscribe_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

fn flow(identity: Arc<ScriptedIdentity>) -> Arc<VerificationFlow> {
    Arc::new(VerificationFlow::new(identity, &Config::default()))
}

async fn wait_for_step(flow: &Arc<VerificationFlow>, step: RegistrationStep) {
    tokio::time::timeout(Duration::from_secs(120), async {
        while flow.step().await != step {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("flow never reached the expected step");
}

#[tokio::test(start_paused = true)]
async fn test_polling_detects_confirmation() {
    let identity = ScriptedIdentity::new();
    let flow = flow(identity.clone());

    flow.start_waiting_for_verification("user@example.com").await;
    assert_eq!(flow.step().await, RegistrationStep::Waiting);
    assert!(flow.is_armed().await);

    identity.set_reply(Reply::Status(ScriptedIdentity::confirmed())).await;
    wait_for_step(&flow, RegistrationStep::Success).await;
    assert_eq!(flow.pending_email().await.as_deref(), Some("user@example.com"));
    assert!(!flow.is_armed().await);
}

#[tokio::test(start_paused = true)]
async fn test_racing_confirmed_checks_advance_exactly_once() {
    let identity = ScriptedIdentity::new();
    let flow = flow(identity.clone());

    flow.start_waiting_for_verification("user@example.com").await;
    identity.set_reply(Reply::Status(ScriptedIdentity::confirmed())).await;

    let (first, second) = tokio::join!(flow.visibility_regained(), flow.visibility_regained());
    // Both checks saw an armed flow and a confirmed status; exactly one
    // of them won the transition.
    assert!(first ^ second);
    assert_eq!(flow.step().await, RegistrationStep::Success);
}

#[tokio::test(start_paused = true)]
async fn test_visibility_recheck_is_inert_when_not_armed() {
    let identity = ScriptedIdentity::new();
    let flow = flow(identity.clone());

    identity.set_reply(Reply::Status(ScriptedIdentity::confirmed())).await;
    assert!(!flow.visibility_regained().await);
    assert_eq!(flow.step().await, RegistrationStep::Form);
    // Not armed, so not even a status fetch went out.
    assert_eq!(identity.status_entered.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reset_disarms_and_in_flight_poll_becomes_noop() {
    let identity = ScriptedIdentity::new();
    identity.block_status.store(true, Ordering::SeqCst);
    identity.set_reply(Reply::Status(ScriptedIdentity::confirmed())).await;

    let flow = flow(identity.clone());
    flow.start_waiting_for_verification("user@example.com").await;

    // Wait until a poll is held in flight inside the stub.
    tokio::time::timeout(Duration::from_secs(120), async {
        while identity.status_entered.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("poller never fired");

    flow.reset_verification().await;
    assert_eq!(flow.step().await, RegistrationStep::Form);
    assert_eq!(flow.pending_email().await, None);

    // Release the delayed poll; its confirmed result must be dropped.
    identity.block_status.store(false, Ordering::SeqCst);
    identity.gate.notify_one();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(flow.step().await, RegistrationStep::Form);
}

#[tokio::test(start_paused = true)]
async fn test_no_polls_fire_after_reset() {
    let identity = ScriptedIdentity::new();
    let flow = flow(identity.clone());

    flow.start_waiting_for_verification("user@example.com").await;
    flow.reset_verification().await;

    let calls_at_reset = identity.status_entered.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(identity.status_entered.load(Ordering::SeqCst), calls_at_reset);
}

#[tokio::test(start_paused = true)]
async fn test_fragment_token_confirmed_jumps_straight_to_success() {
    let identity = ScriptedIdentity::new();
    identity.set_reply(Reply::Status(ScriptedIdentity::confirmed())).await;

    let flow = flow(identity.clone());
    let outcome = flow
        .attach_from_page_url("https://example.com/community#access_token=tok-1&type=signup")
        .await;

    assert_eq!(outcome.step, RegistrationStep::Success);
    assert_eq!(
        outcome.stripped_url.as_deref(),
        Some("https://example.com/community")
    );
    assert_eq!(identity.adopted.lock().await.as_deref(), Some("tok-1"));
    // Confirmed at mount: the waiting phase was never entered.
    assert!(!flow.is_armed().await);
}

#[tokio::test(start_paused = true)]
async fn test_fragment_token_unconfirmed_arms_polling() {
    let identity = ScriptedIdentity::new();
    identity
        .set_reply(Reply::Status(SessionStatus {
            email: Some("user@example.com".to_string()),
            confirmed_at: None,
        }))
        .await;

    let flow = flow(identity.clone());
    let outcome = flow
        .attach_from_page_url("https://example.com/community#access_token=tok-1&type=signup")
        .await;

    assert_eq!(outcome.step, RegistrationStep::Waiting);
    assert_eq!(flow.pending_email().await.as_deref(), Some("user@example.com"));

    // A later poll observes the confirmation.
    identity.set_reply(Reply::Status(ScriptedIdentity::confirmed())).await;
    wait_for_step(&flow, RegistrationStep::Success).await;
}

#[tokio::test(start_paused = true)]
async fn test_url_without_token_leaves_flow_untouched() {
    let identity = ScriptedIdentity::new();
    let flow = flow(identity.clone());

    let outcome = flow
        .attach_from_page_url("https://example.com/community?tab=latest")
        .await;

    assert_eq!(outcome.stripped_url, None);
    assert_eq!(outcome.step, RegistrationStep::Form);
    assert_eq!(identity.status_entered.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_auth_event_with_confirmation_advances() {
    let identity = ScriptedIdentity::new();
    let flow = flow(identity.clone());
    let listener = flow.spawn_event_listener();

    flow.start_waiting_for_verification("user@example.com").await;
    identity.emit(AuthEvent::SignedIn {
        user_id: Uuid::new_v4(),
        email: "user@example.com".to_string(),
        confirmed_at: Some(Utc::now()),
    });

    wait_for_step(&flow, RegistrationStep::Success).await;

    flow.shutdown().await;
    let _ = listener.await;
}

#[tokio::test(start_paused = true)]
async fn test_unconfirmed_or_unarmed_sign_ins_are_ignored() {
    let identity = ScriptedIdentity::new();
    let flow = flow(identity.clone());

    // Not armed: even a confirmed sign-in is somebody else's session.
    let advanced = flow
        .handle_auth_event(&AuthEvent::SignedIn {
            user_id: Uuid::new_v4(),
            email: "other@example.com".to_string(),
            confirmed_at: Some(Utc::now()),
        })
        .await;
    assert!(!advanced);
    assert_eq!(flow.step().await, RegistrationStep::Form);

    // Armed, but the notification carries no confirmation timestamp.
    flow.start_waiting_for_verification("user@example.com").await;
    let advanced = flow
        .handle_auth_event(&AuthEvent::SignedIn {
            user_id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            confirmed_at: None,
        })
        .await;
    assert!(!advanced);
    assert_eq!(flow.step().await, RegistrationStep::Waiting);
}

#[tokio::test(start_paused = true)]
async fn test_failed_status_checks_are_swallowed_and_retried() {
    let identity = ScriptedIdentity::new();
    identity.set_reply(Reply::Error).await;

    let flow = flow(identity.clone());
    flow.start_waiting_for_verification("user@example.com").await;

    // Let a couple of failing polls go by; the flow stays armed.
    tokio::time::timeout(Duration::from_secs(120), async {
        while identity.status_entered.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("poller stopped retrying");
    assert_eq!(flow.step().await, RegistrationStep::Waiting);

    identity.set_reply(Reply::Status(ScriptedIdentity::confirmed())).await;
    wait_for_step(&flow, RegistrationStep::Success).await;
}

#[tokio::test(start_paused = true)]
async fn test_success_then_dismiss_returns_to_form() {
    let identity = ScriptedIdentity::new();
    let flow = flow(identity.clone());

    flow.start_waiting_for_verification("user@example.com").await;
    identity.set_reply(Reply::Status(ScriptedIdentity::confirmed())).await;
    wait_for_step(&flow, RegistrationStep::Success).await;

    flow.dismiss_success().await;
    assert_eq!(flow.step().await, RegistrationStep::Form);
    assert_eq!(flow.pending_email().await, None);
}
