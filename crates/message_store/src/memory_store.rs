//! In-memory store implementation, used by tests and stateless deployments

use async_trait::async_trait;
use chrono::Utc;
use community_core::{ChatMessage, CreatePostData, Post, Profile};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::store::{CommunityStore, MessageStore};

#[derive(Default)]
pub struct MemoryStore {
    transcripts: RwLock<HashMap<String, Vec<ChatMessage>>>,
    posts: RwLock<Vec<Post>>,
    profiles: RwLock<Vec<Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append_message(&self, session_id: &str, message: &ChatMessage) -> Result<()> {
        self.transcripts
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn list_recent_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>> {
        let transcripts = self.transcripts.read().await;
        let messages = transcripts.get(session_id).cloned().unwrap_or_default();
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.into_iter().skip(skip).collect())
    }
}

#[async_trait]
impl CommunityStore for MemoryStore {
    async fn create_post(&self, user_id: Uuid, data: &CreatePostData) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            title: data.title.clone(),
            content: data.content.clone(),
            created_at: Utc::now(),
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(StoreError::Conflict(profile.id.to_string()));
        }
        profiles.push(profile.clone());
        Ok(())
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .find(|p| p.id == user_id)
            .cloned())
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .find(|p| p.email == email)
            .cloned())
    }
}
