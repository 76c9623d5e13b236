use async_trait::async_trait;
use community_core::ChatMessage;

use crate::error::Result;

/// Contract with the remote completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Exchange the conversation so far for one reply. `turns` is ordered
    /// oldest-first and already truncated by the caller.
    async fn complete(&self, system_prompt: &str, turns: &[ChatMessage]) -> Result<String>;
}
