use std::sync::Arc;

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{Media, NewMedia};
use crate::errors::DomainError;
use crate::repositories::memory_store::MemoryStore;

use super::trait_::{MediaFilter, MediaRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryMediaRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    async fn collect(&self, filter: &MediaFilter) -> Result<Vec<Media>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut media: Vec<Media> = tables
            .media
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        media.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(media)
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn create(&self, media: NewMedia) -> Result<Media, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.articles.contains_key(&media.article_id) {
            return Err(DomainError::not_found("Article"));
        }
        let id = tables.next_id();
        let media = media.into_media(id);
        tables.media.insert(id, media.clone());
        Ok(media)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Media>, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.read().await.media.get(&id).cloned())
    }

    async fn update(&self, media: Media) -> Result<Media, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.media.contains_key(&media.id) {
            return Err(DomainError::not_found("Media"));
        }
        if !tables.articles.contains_key(&media.article_id) {
            return Err(DomainError::not_found("Article"));
        }
        tables.media.insert(media.id, media.clone());
        Ok(media)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.write().await.media.remove(&id).is_some())
    }

    async fn list(
        &self,
        filter: &MediaFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Media>, DomainError> {
        Ok(PaginatedResponse::from_vec(self.collect(filter).await?, pagination))
    }

    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<Media>, DomainError> {
        let filter = MediaFilter {
            article_id: Some(article_id),
            media_type: None,
        };
        self.collect(&filter).await
    }
}
