//! Post feed - the community board's read and write operations
//!
//! Joins posts with their author profiles for display and gates creation
//! on a signed-in user. Profile lookups are tolerant: a missing author
//! renders as an anonymous byline rather than failing the whole feed.

use chrono::Utc;
use community_core::{CreatePostData, Post, PostView, User};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::store::CommunityStore;
use crate::time_ago::time_ago;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("You must be signed in to create a post")]
    NotSignedIn,

    #[error("Failed to create post: {0}")]
    Store(#[from] crate::error::StoreError),
}

pub struct PostFeed {
    store: Arc<dyn CommunityStore>,
}

impl PostFeed {
    pub fn new(store: Arc<dyn CommunityStore>) -> Self {
        Self { store }
    }

    /// Create a post on behalf of `user`; rejected when nobody is signed in.
    pub async fn create_post(
        &self,
        user: Option<&User>,
        data: &CreatePostData,
    ) -> std::result::Result<Post, FeedError> {
        let user = user.ok_or(FeedError::NotSignedIn)?;
        Ok(self.store.create_post(user.id, data).await?)
    }

    /// All posts, newest first, joined with author profiles.
    pub async fn list_posts(&self) -> std::result::Result<Vec<PostView>, FeedError> {
        let posts = self.store.list_posts().await?;
        let now = Utc::now();

        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.view(post, now).await);
        }
        Ok(views)
    }

    async fn view(&self, post: Post, now: chrono::DateTime<Utc>) -> PostView {
        let profile = match self.store.find_profile(post.user_id).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(post_id = %post.id, error = %err, "author lookup failed");
                None
            }
        };

        let (author, avatar, badge) = match &profile {
            Some(profile) => (
                profile.full_name(),
                profile.avatar(),
                profile
                    .school
                    .clone()
                    .unwrap_or_else(|| "Community Member".to_string()),
            ),
            None => (
                "Anonymous User".to_string(),
                "?".to_string(),
                "Community Member".to_string(),
            ),
        };

        PostView {
            id: post.id,
            author,
            avatar,
            badge,
            title: post.title,
            content: post.content,
            time_ago: time_ago(post.created_at, now),
            comments: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use community_core::Profile;
    use uuid::Uuid;

    fn user(id: Uuid) -> User {
        User {
            id,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_requires_signed_in_user() {
        let feed = PostFeed::new(Arc::new(MemoryStore::new()));
        let err = feed
            .create_post(
                None,
                &CreatePostData {
                    title: "t".to_string(),
                    content: "c".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::NotSignedIn));
        assert_eq!(err.to_string(), "You must be signed in to create a post");
    }

    #[tokio::test]
    async fn test_listing_joins_author_profile() {
        let store = Arc::new(MemoryStore::new());
        let author_id = Uuid::new_v4();
        store
            .create_profile(&Profile {
                id: author_id,
                email: "ada@example.com".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                user_type: "student".to_string(),
                school: Some("Somerville".to_string()),
            })
            .await
            .unwrap();

        let feed = PostFeed::new(store);
        feed.create_post(
            Some(&user(author_id)),
            &CreatePostData {
                title: "We're officially live!".to_string(),
                content: "Hello".to_string(),
            },
        )
        .await
        .unwrap();

        let views = feed.list_posts().await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].author, "Ada Lovelace");
        assert_eq!(views[0].avatar, "A");
        assert_eq!(views[0].badge, "Somerville");
        assert_eq!(views[0].time_ago, "just now");
    }

    #[tokio::test]
    async fn test_missing_author_renders_anonymous() {
        let store = Arc::new(MemoryStore::new());
        let feed = PostFeed::new(store);
        feed.create_post(
            Some(&user(Uuid::new_v4())),
            &CreatePostData {
                title: "t".to_string(),
                content: "c".to_string(),
            },
        )
        .await
        .unwrap();

        let views = feed.list_posts().await.unwrap();
        assert_eq!(views[0].author, "Anonymous User");
        assert_eq!(views[0].avatar, "?");
        assert_eq!(views[0].badge, "Community Member");
    }
}
