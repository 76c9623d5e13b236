//! Chat transcript entries
//!
//! A transcript is an append-only sequence of `ChatMessage` values;
//! insertion order is chronological and must be preserved by any render
//! or replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Stable wire name, also used as the completion-request role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_wire_names() {
        assert_eq!(Sender::User.as_str(), "user");
        assert_eq!(Sender::Bot.as_str(), "bot");
    }

    #[test]
    fn constructors_tag_sender() {
        assert_eq!(ChatMessage::user("hi").sender, Sender::User);
        assert_eq!(ChatMessage::bot("hello").sender, Sender::Bot);
    }
}
