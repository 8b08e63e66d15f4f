use std::sync::Arc;

use sefr_shared::types::{PaginatedResponse, Pagination};
use sefr_shared::validation::is_valid_url;

use crate::domain::entities::{Media, NewMedia, User};
use crate::domain::value_objects::{MediaChanges, MediaInput};
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{ArticleRepository, MediaFilter, MediaRepository};
use crate::services::clock::Clock;

use super::ensure_can_modify;

/// Images and videos attached to articles. Only the article's author (or
/// staff) may attach, change or remove media.
pub struct MediaService {
    media: Arc<dyn MediaRepository>,
    articles: Arc<dyn ArticleRepository>,
    clock: Arc<dyn Clock>,
}

impl MediaService {
    pub fn new(
        media: Arc<dyn MediaRepository>,
        articles: Arc<dyn ArticleRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            media,
            articles,
            clock,
        }
    }

    pub async fn list(
        &self,
        filter: &MediaFilter,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<Media>> {
        self.media.list(filter, pagination.normalized()).await
    }

    pub async fn get(&self, id: i64) -> DomainResult<Media> {
        self.media
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Media"))
    }

    pub async fn create(&self, actor: &User, input: MediaInput) -> DomainResult<Media> {
        let url = input.url.trim().to_string();
        if !is_valid_url(&url) {
            return Err(ValidationError::InvalidUrl.into());
        }
        let article = self
            .articles
            .find_by_id(input.article_id)
            .await?
            .ok_or_else(|| DomainError::Validation {
                message: format!("Article {} does not exist", input.article_id),
            })?;
        ensure_can_modify(actor, article.author_id, "article")?;

        let alt_text = input
            .alt_text
            .map(|alt| alt.trim().to_string())
            .filter(|alt| !alt.is_empty());

        self.media
            .create(NewMedia {
                article_id: article.id,
                media_type: input.media_type,
                url,
                alt_text,
                now: self.clock.now(),
            })
            .await
    }

    /// Apply `changes` to a media item.
    ///
    /// The actor must be allowed to modify the current article, and also the
    /// target article when the media moves.
    pub async fn update(&self, actor: &User, id: i64, changes: MediaChanges) -> DomainResult<Media> {
        let mut media = self.get(id).await?;
        if let Some(article) = self.articles.find_by_id(media.article_id).await? {
            ensure_can_modify(actor, article.author_id, "article")?;
        }

        if let Some(article_id) = changes.article_id.filter(|id| *id != media.article_id) {
            let target = self
                .articles
                .find_by_id(article_id)
                .await?
                .ok_or_else(|| DomainError::Validation {
                    message: format!("Article {} does not exist", article_id),
                })?;
            ensure_can_modify(actor, target.author_id, "article")?;
            media.article_id = target.id;
        }
        if let Some(media_type) = changes.media_type {
            media.media_type = media_type;
        }
        if let Some(url) = changes.url {
            let url = url.trim().to_string();
            if !is_valid_url(&url) {
                return Err(ValidationError::InvalidUrl.into());
            }
            media.url = url;
        }
        if let Some(alt) = changes.alt_text {
            let alt = alt.trim();
            media.alt_text = (!alt.is_empty()).then(|| alt.to_string());
        }

        let media = self.media.update(media).await?;
        tracing::debug!(media_id = media.id, actor_id = %actor.id, "Media updated");
        Ok(media)
    }

    pub async fn delete(&self, actor: &User, id: i64) -> DomainResult<()> {
        let media = self.get(id).await?;
        if let Some(article) = self.articles.find_by_id(media.article_id).await? {
            ensure_can_modify(actor, article.author_id, "article")?;
        }
        self.media.delete(id).await?;
        Ok(())
    }
}
