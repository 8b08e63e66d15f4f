//! Reader comments on articles, optionally threaded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    /// Comment this one replies to; always on the same article
    pub parent_id: Option<i64>,
    /// Moderation flag, false until staff approve
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub parent_id: Option<i64>,
    pub now: DateTime<Utc>,
}

impl NewComment {
    pub fn into_comment(self, id: i64) -> Comment {
        Comment {
            id,
            article_id: self.article_id,
            author_id: self.author_id,
            content: self.content,
            parent_id: self.parent_id,
            is_approved: false,
            created_at: self.now,
            updated_at: self.now,
        }
    }
}
