//! Storage traits for transcripts, posts and profiles

use async_trait::async_trait;
use community_core::{ChatMessage, CreatePostData, Post, Profile};
use uuid::Uuid;

use crate::error::Result;

/// Persistence for chat transcripts, keyed by a session identifier.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append one transcript entry.
    async fn append_message(&self, session_id: &str, message: &ChatMessage) -> Result<()>;

    /// The most recent `limit` entries, ordered oldest-first.
    async fn list_recent_messages(&self, session_id: &str, limit: usize) -> Result<Vec<ChatMessage>>;
}

/// Persistence for community posts and the profiles backing them.
#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Insert a post and return it with id and timestamp assigned.
    async fn create_post(&self, user_id: Uuid, data: &CreatePostData) -> Result<Post>;

    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// Insert a profile row; `Conflict` if the id is already present.
    async fn create_profile(&self, profile: &Profile) -> Result<()>;

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>>;
}
