//! Inputs and read models of the content services.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{Article, Comment, Media, MediaType};

/// Fields accepted when creating or replacing a category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    /// Derived from the name when absent or blank
    pub slug: Option<String>,
    pub parent_id: Option<i64>,
}

/// Fields accepted when creating a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub article_id: Uuid,
    pub content: String,
    pub parent_id: Option<i64>,
}

/// Fields accepted when attaching media to an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInput {
    pub article_id: Uuid,
    pub media_type: MediaType,
    pub url: String,
    pub alt_text: Option<String>,
}

/// Partial media update; `None` keeps the stored value and a blank
/// `alt_text` clears it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaChanges {
    pub article_id: Option<Uuid>,
    pub media_type: Option<MediaType>,
    pub url: Option<String>,
    pub alt_text: Option<String>,
}

impl From<MediaInput> for MediaChanges {
    fn from(input: MediaInput) -> Self {
        Self {
            article_id: Some(input.article_id),
            media_type: Some(input.media_type),
            url: Some(input.url),
            alt_text: Some(input.alt_text.unwrap_or_default()),
        }
    }
}

/// Profile fields a user may change; `None` leaves the field as is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// An article with everything the detail view shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub media: Vec<Media>,
    pub comments: Vec<Comment>,
    pub likes_count: u64,
    pub views_count: u64,
}

/// Result of liking an article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    AlreadyLiked,
}

impl LikeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeOutcome::Liked => "liked",
            LikeOutcome::AlreadyLiked => "already liked",
        }
    }
}
