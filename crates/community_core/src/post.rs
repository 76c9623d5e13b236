//! Community posts and their rendered views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored community post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post joined with its author profile, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub author: String,
    pub avatar: String,
    pub badge: String,
    pub title: String,
    pub content: String,
    pub time_ago: String,
    pub comments: usize,
}

/// Payload of the create-post form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostData {
    pub title: String,
    pub content: String,
}
