//! Registration steps - the phases of the signup flow

use serde::{Deserialize, Serialize};

/// The UI phase of the registration flow.
///
/// Progression is monotonic: `Form -> Waiting -> Success`, with the one
/// exception that a confirmation token carried in the page URL may jump
/// straight from `Form` to `Success`. The only way back to `Form` is an
/// explicit reset or dismissal.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    /// The registration form is shown; nothing has been submitted.
    Form,

    /// Signup succeeded; waiting for the confirmation email to be acted on.
    Waiting,

    /// The email address was confirmed.
    Success,
}

impl Default for RegistrationStep {
    fn default() -> Self {
        RegistrationStep::Form
    }
}

impl RegistrationStep {
    /// Whether the confirmation-detection channels are eligible to fire.
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Whether a confirmation observation can still change the step.
    pub fn accepts_confirmation(&self) -> bool {
        matches!(self, Self::Form | Self::Waiting)
    }

    /// Get a human-readable description of the current step.
    pub fn description(&self) -> &str {
        match self {
            Self::Form => "Ready to register",
            Self::Waiting => "Waiting for email confirmation",
            Self::Success => "Email confirmed",
        }
    }
}
