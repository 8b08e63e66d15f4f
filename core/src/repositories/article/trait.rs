//! Article repository trait, including likes and views

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{Article, ArticleLike, ArticleStatus, ArticleView};
use crate::errors::DomainError;

/// Optional list filters; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub status: Option<ArticleStatus>,
    pub category_id: Option<i64>,
    pub author_id: Option<Uuid>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        self.status.map_or(true, |s| article.status == s)
            && self.category_id.map_or(true, |c| article.category_id == c)
            && self.author_id.map_or(true, |a| article.author_id == a)
    }
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert an article. A taken slug yields `ValidationError::DuplicateValue`.
    async fn create(&self, article: Article) -> Result<Article, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, DomainError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError>;

    async fn update(&self, article: Article) -> Result<Article, DomainError>;

    /// Delete an article with its media, comments, likes and views
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// List matching articles, newest first
    async fn list(
        &self,
        filter: &ArticleFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Article>, DomainError>;

    /// Record a like. Returns false when this user already liked the article.
    async fn add_like(&self, like: ArticleLike) -> Result<bool, DomainError>;

    async fn count_likes(&self, article_id: Uuid) -> Result<u64, DomainError>;

    /// Record a view. Returns true the first time a user views the article,
    /// in which case the article's `view_count` is incremented as well.
    async fn record_view(&self, view: ArticleView) -> Result<bool, DomainError>;

    async fn count_views(&self, article_id: Uuid) -> Result<u64, DomainError>;
}
