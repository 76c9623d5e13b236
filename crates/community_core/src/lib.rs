//! community_core - Core types shared across the community and chat crates
//!
//! This crate provides the foundational types used by the other crates:
//! - `message` - Chat transcript entries
//! - `user` - Accounts, profiles and the auth form payloads
//! - `post` - Community posts and their rendered views
//! - `config` - Runtime configuration for the external services

pub mod config;
pub mod message;
pub mod post;
pub mod user;

// Re-export commonly used types
pub use config::Config;
pub use message::{ChatMessage, Sender};
pub use post::{CreatePostData, Post, PostView};
pub use user::{Profile, RegistrationData, SignInData, User};
