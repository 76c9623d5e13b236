//! Registration state machine: states, events and transition logic.

mod events;
mod states;
mod transitions;

pub use events::{ConfirmationSource, VerificationEvent};
pub use states::RegistrationStep;
pub use transitions::{StateMachine, StateTransition};
