//! Verification events - what can move the registration flow

use serde::{Deserialize, Serialize};

/// The independent channels that can observe a confirmed email.
///
/// Any of them may fire first; the machine treats them identically and
/// ignores every observation after the first one that lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationSource {
    /// An auth-state notification carrying a confirmation timestamp.
    AuthEvent,
    /// The one-shot status fetch issued when the page regains focus.
    VisibilityRecheck,
    /// The fixed-interval status poll.
    Poll,
    /// The signup access token parsed from the page URL fragment.
    FragmentToken,
}

impl ConfirmationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthEvent => "auth_event",
            Self::VisibilityRecheck => "visibility_recheck",
            Self::Poll => "poll",
            Self::FragmentToken => "fragment_token",
        }
    }
}

/// Defines the events that can trigger transitions in the registration FSM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationEvent {
    /// A signup call to the identity provider just succeeded.
    SignupAccepted { email: String },

    /// A detection channel observed a confirmed status.
    ConfirmationObserved { source: ConfirmationSource },

    /// The user cancelled or closed the flow.
    FlowReset,

    /// The user dismissed the success screen.
    SuccessDismissed,
}

impl VerificationEvent {
    /// Check if this event is user-initiated.
    pub fn is_user_event(&self) -> bool {
        matches!(self, Self::FlowReset | Self::SuccessDismissed)
    }

    /// Check if this event proposes the waiting-to-success transition.
    pub fn is_confirmation(&self) -> bool {
        matches!(self, Self::ConfirmationObserved { .. })
    }
}
