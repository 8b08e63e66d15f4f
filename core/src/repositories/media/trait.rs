//! Media repository trait

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{Media, MediaType, NewMedia};
use crate::errors::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaFilter {
    pub article_id: Option<Uuid>,
    pub media_type: Option<MediaType>,
}

impl MediaFilter {
    pub fn matches(&self, media: &Media) -> bool {
        self.article_id.map_or(true, |a| media.article_id == a)
            && self.media_type.map_or(true, |t| media.media_type == t)
    }
}

#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn create(&self, media: NewMedia) -> Result<Media, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Media>, DomainError>;

    async fn update(&self, media: Media) -> Result<Media, DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// List matching media, newest first
    async fn list(
        &self,
        filter: &MediaFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Media>, DomainError>;

    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<Media>, DomainError>;
}
