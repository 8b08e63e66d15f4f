//! Comment repository trait

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{Comment, NewComment};
use crate::errors::DomainError;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError>;

    async fn update(&self, comment: Comment) -> Result<Comment, DomainError>;

    /// Delete a comment and every reply beneath it
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// List comments newest first, optionally for a single article
    async fn list(
        &self,
        article_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Comment>, DomainError>;

    /// All comments on an article, newest first
    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<Comment>, DomainError>;
}
