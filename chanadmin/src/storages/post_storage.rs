use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    document_store::{DocumentStoreTrait, Domain},
    records::{decode_records, encode_record},
};

/// Media attached to a post, referenced by Telegram file id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostMedia {
    Photo { file_id: String },
    Video { file_id: String },
    Document { file_id: String },
}

impl PostMedia {
    pub fn kind(&self) -> &'static str {
        match self {
            PostMedia::Photo { .. } => "photo",
            PostMedia::Video { .. } => "video",
            PostMedia::Document { .. } => "document",
        }
    }
}

/// Inline button published under a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostButton {
    Url { label: String, url: String },
    Callback { label: String, data: String },
}

impl PostButton {
    pub fn label(&self) -> &str {
        match self {
            PostButton::Url { label, .. } | PostButton::Callback { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub id: String,
    pub channel_id: String,
    pub text: String,
    #[serde(default)]
    pub media: Option<PostMedia>,
    #[serde(default)]
    pub buttons: Vec<PostButton>,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Posts waiting for publication, stored in scheduled_posts.json
#[derive(Clone)]
pub struct PostStorage {
    documents: Arc<dyn DocumentStoreTrait>,
}

impl PostStorage {
    pub fn new(documents: Arc<dyn DocumentStoreTrait>) -> Self {
        Self { documents }
    }

    /// All posts ordered by publication time
    pub async fn list_posts(&self) -> Vec<ScheduledPost> {
        let posts = self.documents.load(Domain::ScheduledPosts).await;
        let mut posts: Vec<ScheduledPost> = decode_records(Domain::ScheduledPosts, posts)
            .into_iter()
            .map(|(_, post)| post)
            .collect();
        posts.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        posts
    }

    /// Posts whose publication time is at or before `now`
    pub async fn due_posts(&self, now: DateTime<Utc>) -> Vec<ScheduledPost> {
        self.list_posts()
            .await
            .into_iter()
            .filter(|post| post.scheduled_at <= now)
            .collect()
    }

    pub async fn add_post(&self, post: &ScheduledPost) -> bool {
        let mut posts = self.documents.load(Domain::ScheduledPosts).await;
        let Some(value) = encode_record(Domain::ScheduledPosts, post) else {
            return false;
        };
        posts.insert(post.id.clone(), value);
        self.documents.save(Domain::ScheduledPosts, &posts).await
    }

    /// Remove posts by id, returns how many were present
    pub async fn remove_posts(&self, ids: &[String]) -> usize {
        let mut posts = self.documents.load(Domain::ScheduledPosts).await;
        let removed = ids.iter().filter(|id| posts.remove(id.as_str()).is_some()).count();
        if removed > 0 {
            self.documents.save(Domain::ScheduledPosts, &posts).await;
        }
        removed
    }

    pub async fn remove_post(&self, id: &str) -> bool {
        self.remove_posts(&[id.to_string()]).await == 1
    }
}
