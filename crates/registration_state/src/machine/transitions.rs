//! State transitions - the registration FSM
//!
//! The machine is the single authoritative owner of the step and the
//! pending email. Detection channels only propose a one-way transition
//! through `handle_event`; a proposal that arrives after the step has
//! already advanced is a silent no-op.

use super::events::VerificationEvent;
use super::states::RegistrationStep;

/// Represents a state transition result.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The step before the transition.
    pub from: RegistrationStep,
    /// The step after the transition.
    pub to: RegistrationStep,
    /// The event that triggered the transition.
    pub event: VerificationEvent,
    /// Whether the step actually changed.
    pub changed: bool,
}

/// State machine for the registration flow.
#[derive(Debug, Clone)]
pub struct StateMachine {
    /// Current step.
    current_step: RegistrationStep,
    /// The address awaiting confirmation; set when entering `Waiting`.
    pending_email: Option<String>,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    /// Max history entries to keep.
    max_history: usize,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine showing the registration form.
    pub fn new() -> Self {
        Self {
            current_step: RegistrationStep::Form,
            pending_email: None,
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Get the current step.
    pub fn step(&self) -> RegistrationStep {
        self.current_step
    }

    /// The email awaiting confirmation, if the flow got here via a signup.
    pub fn pending_email(&self) -> Option<&str> {
        self.pending_email.as_deref()
    }

    /// Whether detection channels are eligible to fire.
    pub fn is_armed(&self) -> bool {
        self.current_step.is_armed()
    }

    /// Get the transition history.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Handle an event and transition to a new step.
    pub fn handle_event(&mut self, event: VerificationEvent) -> StateTransition {
        use RegistrationStep::*;
        use VerificationEvent::*;

        let old_step = self.current_step;
        let new_step = match (old_step, &event) {
            // A successful signup arms the flow. Re-entry while already
            // waiting is tolerated; the email is refreshed in place. An
            // empty address (URL-token path, address not yet known) arms
            // the flow without a pending email.
            (Form, SignupAccepted { email }) | (Waiting, SignupAccepted { email }) => {
                self.pending_email = Some(email.clone()).filter(|e| !e.is_empty());
                Waiting
            }

            // First confirmed observation wins, from whichever channel.
            // The Form arm covers the URL-token path, which may confirm
            // before the waiting screen was ever shown.
            (Waiting, ConfirmationObserved { .. }) | (Form, ConfirmationObserved { .. }) => Success,

            // Cancel/close from any step.
            (_, FlowReset) => {
                self.pending_email = None;
                Form
            }

            (Success, SuccessDismissed) => {
                self.pending_email = None;
                Form
            }

            // Default: no transition. Covers late duplicate confirmations
            // landing after Success, which must be silent no-ops.
            _ => old_step,
        };

        let changed = old_step != new_step;
        if changed {
            tracing::info!(
                from = ?old_step,
                to = ?new_step,
                event = ?event,
                "registration step transition"
            );
        } else {
            tracing::debug!(step = ?old_step, event = ?event, "registration step unchanged");
        }

        self.current_step = new_step;

        let transition = StateTransition {
            from: old_step,
            to: new_step,
            event,
            changed,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        transition
    }

    /// Check whether an event would change the step, without applying it.
    pub fn can_transition(&self, event: &VerificationEvent) -> bool {
        use RegistrationStep::*;
        use VerificationEvent::*;

        match (self.current_step, event) {
            (Form | Waiting, SignupAccepted { .. }) => true,
            (Form | Waiting, ConfirmationObserved { .. }) => true,
            (Waiting | Success, FlowReset) => true,
            (Success, SuccessDismissed) => true,
            _ => false,
        }
    }
}
