use sefr_core::domain::entities::{ArticleDraft, ArticleStatus, MediaType};
use sefr_core::repositories::{ArticleFilter, MediaFilter};
use sefr_core::value_objects::{CategoryInput, CommentInput, MediaChanges, MediaInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Derived from the name when absent or blank
    #[validate(length(max = 100))]
    pub slug: Option<String>,
    #[serde(alias = "parent_id")]
    pub parent: Option<i64>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(request: CategoryRequest) -> Self {
        Self {
            name: request.name,
            slug: request.slug,
            parent_id: request.parent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ArticleRequest {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub seo_title: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub seo_description: String,
    #[validate(url)]
    pub main_image: Option<String>,
    #[serde(alias = "category_id")]
    pub category: i64,
    /// Defaults to draft
    pub status: Option<ArticleStatus>,
}

impl From<ArticleRequest> for ArticleDraft {
    fn from(request: ArticleRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            seo_title: request.seo_title,
            seo_description: request.seo_description,
            main_image: request.main_image,
            category_id: request.category,
            status: request.status.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[serde(alias = "article_id")]
    pub article: Uuid,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(alias = "parent_id")]
    pub parent: Option<i64>,
}

impl From<CommentRequest> for CommentInput {
    fn from(request: CommentRequest) -> Self {
        Self {
            article_id: request.article,
            content: request.content,
            parent_id: request.parent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentUpdateRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MediaRequest {
    #[serde(alias = "article_id")]
    pub article: Uuid,
    pub media_type: MediaType,
    #[validate(url)]
    pub url: String,
    #[validate(length(max = 200))]
    pub alt_text: Option<String>,
}

impl From<MediaRequest> for MediaInput {
    fn from(request: MediaRequest) -> Self {
        Self {
            article_id: request.article,
            media_type: request.media_type,
            url: request.url,
            alt_text: request.alt_text,
        }
    }
}

/// Body of PATCH on `/media/{id}/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MediaPatchRequest {
    #[serde(alias = "article_id")]
    pub article: Option<Uuid>,
    pub media_type: Option<MediaType>,
    #[validate(url)]
    pub url: Option<String>,
    #[validate(length(max = 200))]
    pub alt_text: Option<String>,
}

impl From<MediaPatchRequest> for MediaChanges {
    fn from(request: MediaPatchRequest) -> Self {
        Self {
            article_id: request.article,
            media_type: request.media_type,
            url: request.url,
            alt_text: request.alt_text,
        }
    }
}

/// `{"status": "liked"}` and friends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryListQuery {
    pub parent: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListQuery {
    pub status: Option<ArticleStatus>,
    pub category: Option<i64>,
    pub author: Option<Uuid>,
}

impl From<ArticleListQuery> for ArticleFilter {
    fn from(query: ArticleListQuery) -> Self {
        Self {
            status: query.status,
            category_id: query.category,
            author_id: query.author,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListQuery {
    pub article: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaListQuery {
    pub article: Option<Uuid>,
    pub media_type: Option<MediaType>,
}

impl From<MediaListQuery> for MediaFilter {
    fn from(query: MediaListQuery) -> Self {
        Self {
            article_id: query.article,
            media_type: query.media_type,
        }
    }
}
