use std::sync::Arc;

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{Comment, NewComment};
use crate::errors::DomainError;
use crate::repositories::memory_store::MemoryStore;

use super::trait_::CommentRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCommentRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    async fn collect(&self, article_id: Option<Uuid>) -> Result<Vec<Comment>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| article_id.map_or(true, |a| c.article_id == a))
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.articles.contains_key(&comment.article_id) {
            return Err(DomainError::not_found("Article"));
        }
        let id = tables.next_id();
        let comment = comment.into_comment(id);
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.read().await.comments.get(&id).cloned())
    }

    async fn update(&self, comment: Comment) -> Result<Comment, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.comments.contains_key(&comment.id) {
            return Err(DomainError::not_found("Comment"));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.write().await.cascade_delete_comment(id))
    }

    async fn list(
        &self,
        article_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Comment>, DomainError> {
        Ok(PaginatedResponse::from_vec(self.collect(article_id).await?, pagination))
    }

    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        self.collect(Some(article_id)).await
    }
}
