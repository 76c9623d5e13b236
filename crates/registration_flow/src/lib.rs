//! registration_flow - Drives the signup and email-verification UX
//!
//! The flow owns the registration state machine and reconciles
//! confirmation signals arriving through four independent channels:
//! auth-state events, a visibility recheck, interval polling, and a
//! signup token carried in the page URL. Whichever channel observes a
//! confirmed status first wins; everything after that is a no-op.
//!
//! The crate also holds the account session (sign-up, sign-in, the
//! transactional sign-out) that feeds the flow.

pub mod account;
pub mod error;
pub mod flow;
pub mod fragment;

pub use account::AccountSession;
pub use error::{AccountError, Result};
pub use flow::{MountOutcome, VerificationFlow};
pub use fragment::{parse_signup_fragment, SignupToken};
