//! registration_state - State machine for the registration/verification flow
//!
//! This crate provides the state machine that drives the three-phase
//! signup UX: form, waiting for email confirmation, success.

pub mod machine;

// Re-export commonly used types
pub use machine::{ConfirmationSource, RegistrationStep, StateMachine, StateTransition, VerificationEvent};
