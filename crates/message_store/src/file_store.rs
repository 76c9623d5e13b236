//! File-based store implementation
//!
//! One JSON file per transcript session plus flat `posts.json` and
//! `profiles.json` collections. Suited to a single-process deployment;
//! there is no cross-process locking.

use async_trait::async_trait;
use chrono::Utc;
use community_core::{ChatMessage, CreatePostData, Post, Profile};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::store::{CommunityStore, MessageStore};

#[derive(Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn transcript_path(&self, session_id: &str) -> PathBuf {
        self.base_path
            .join("messages")
            .join(format!("{}.json", session_id))
    }

    fn posts_path(&self) -> PathBuf {
        self.base_path.join("posts.json")
    }

    fn profiles_path(&self) -> PathBuf {
        self.base_path.join("profiles.json")
    }

    async fn load_vec<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    async fn save_vec<T: Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(items)?;
        fs::write(path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for FileStore {
    async fn append_message(&self, session_id: &str, message: &ChatMessage) -> Result<()> {
        let path = self.transcript_path(session_id);
        let mut messages: Vec<ChatMessage> = self.load_vec(&path).await?;
        messages.push(message.clone());
        self.save_vec(&path, &messages).await
    }

    async fn list_recent_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>> {
        let messages: Vec<ChatMessage> = self.load_vec(&self.transcript_path(session_id)).await?;
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.into_iter().skip(skip).collect())
    }
}

#[async_trait]
impl CommunityStore for FileStore {
    async fn create_post(&self, user_id: Uuid, data: &CreatePostData) -> Result<Post> {
        let path = self.posts_path();
        let mut posts: Vec<Post> = self.load_vec(&path).await?;

        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            title: data.title.clone(),
            content: data.content.clone(),
            created_at: Utc::now(),
        };
        posts.push(post.clone());
        self.save_vec(&path, &posts).await?;
        Ok(post)
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.load_vec(&self.posts_path()).await?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        let path = self.profiles_path();
        let mut profiles: Vec<Profile> = self.load_vec(&path).await?;

        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(StoreError::Conflict(profile.id.to_string()));
        }
        profiles.push(profile.clone());
        self.save_vec(&path, &profiles).await
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profiles: Vec<Profile> = self.load_vec(&self.profiles_path()).await?;
        Ok(profiles.into_iter().find(|p| p.id == user_id))
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let profiles: Vec<Profile> = self.load_vec(&self.profiles_path()).await?;
        Ok(profiles.into_iter().find(|p| p.email == email))
    }
}
