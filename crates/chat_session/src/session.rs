//! The conversation session

use community_core::{ChatMessage, Config};
use completion_client::CompletionService;
use message_store::MessageStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::error::{ChatError, Result};

/// Appended in place of a reply when the completion call fails or
/// returns nothing.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later!";

struct Inner {
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
}

struct WiredStore {
    store: Arc<dyn MessageStore>,
    session_id: String,
}

/// A chat widget's conversation: an append-only transcript plus the
/// one-outstanding-request exchange loop.
pub struct ChatSession {
    completion: Arc<dyn CompletionService>,
    store: Option<WiredStore>,
    system_prompt: String,
    history_window: usize,
    inner: RwLock<Inner>,
}

impl ChatSession {
    /// Stateless session: each request carries only the new message.
    /// The transcript starts with the scripted greeting.
    pub fn new(completion: Arc<dyn CompletionService>, config: &Config) -> Self {
        Self {
            completion,
            store: None,
            system_prompt: config.system_prompt.clone(),
            history_window: config.history_window,
            inner: RwLock::new(Inner {
                messages: vec![ChatMessage::bot(config.greeting.clone())],
                awaiting_reply: false,
            }),
        }
    }

    /// Wire in a message store: appends are mirrored there and requests
    /// carry the most recent stored turns as context.
    pub fn with_store(mut self, store: Arc<dyn MessageStore>, session_id: Option<String>) -> Self {
        self.store = Some(WiredStore {
            store,
            session_id: session_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        });
        self
    }

    /// Current transcript, oldest first.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.inner.read().await.messages.clone()
    }

    pub async fn is_awaiting_reply(&self) -> bool {
        self.inner.read().await.awaiting_reply
    }

    /// Send one user message and exchange it for a reply.
    ///
    /// The user entry lands in the transcript before the request goes
    /// out; the bot entry (reply or fallback) lands after it settles, and
    /// the pending flag is cleared on every path. A second send while a
    /// reply is pending is rejected without touching the transcript.
    pub async fn send(&self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let user_message = ChatMessage::user(text);
        {
            let mut inner = self.inner.write().await;
            if inner.awaiting_reply {
                return Err(ChatError::ReplyPending);
            }
            inner.awaiting_reply = true;
            inner.messages.push(user_message.clone());
        }

        let reply = match self.exchange(&user_message).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "completion exchange failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };

        let bot_message = ChatMessage::bot(reply.clone());
        self.mirror(&bot_message).await;
        {
            let mut inner = self.inner.write().await;
            inner.messages.push(bot_message);
            inner.awaiting_reply = false;
        }

        Ok(reply)
    }

    /// Build the request context and run the completion call.
    async fn exchange(
        &self,
        user_message: &ChatMessage,
    ) -> std::result::Result<String, completion_client::CompletionError> {
        // History is read before the new message is mirrored so the
        // message is not sent twice. Older turns beyond the window are
        // dropped silently.
        let mut turns = match &self.store {
            Some(wired) => wired
                .store
                .list_recent_messages(&wired.session_id, self.history_window)
                .await
                .unwrap_or_else(|err| {
                    warn!(error = %err, "history fetch failed, sending without context");
                    Vec::new()
                }),
            None => Vec::new(),
        };

        self.mirror(user_message).await;
        turns.push(user_message.clone());

        self.completion.complete(&self.system_prompt, &turns).await
    }

    async fn mirror(&self, message: &ChatMessage) {
        if let Some(wired) = &self.store {
            if let Err(err) = wired.store.append_message(&wired.session_id, message).await {
                warn!(error = %err, "transcript mirror failed");
            }
        }
    }
}
