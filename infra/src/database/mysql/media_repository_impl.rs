//! MySQL implementation of the MediaRepository trait.

use async_trait::async_trait;
use sefr_core::domain::entities::{Media, MediaType, NewMedia};
use sefr_core::errors::DomainError;
use sefr_core::repositories::{MediaFilter, MediaRepository};
use sefr_shared::types::{PaginatedResponse, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use super::{column, count_column, db_error, enum_column, uuid_column};

const MEDIA_COLUMNS: &str = "id, article_id, media_type, url, alt_text, created_at";

pub struct MySqlMediaRepository {
    pool: MySqlPool,
}

impl MySqlMediaRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_media(row: &MySqlRow) -> Result<Media, DomainError> {
        let media_type: MediaType = enum_column(row, "media_type")?;
        Ok(Media {
            id: column(row, "id")?,
            article_id: uuid_column(row, "article_id")?,
            media_type,
            url: column(row, "url")?,
            alt_text: column(row, "alt_text")?,
            created_at: column(row, "created_at")?,
        })
    }

    fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &MediaFilter) {
        builder.push(" WHERE 1 = 1");
        if let Some(article_id) = filter.article_id {
            builder.push(" AND article_id = ").push_bind(article_id.to_string());
        }
        if let Some(media_type) = filter.media_type {
            builder.push(" AND media_type = ").push_bind(media_type.as_str());
        }
    }
}

#[async_trait]
impl MediaRepository for MySqlMediaRepository {
    async fn create(&self, media: NewMedia) -> Result<Media, DomainError> {
        let result = sqlx::query(
            "INSERT INTO media (article_id, media_type, url, alt_text, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(media.article_id.to_string())
        .bind(media.media_type.as_str())
        .bind(&media.url)
        .bind(&media.alt_text)
        .bind(media.now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create media", e))?;

        Ok(media.into_media(result.last_insert_id() as i64))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Media>, DomainError> {
        let query = format!("SELECT {} FROM media WHERE id = ?", MEDIA_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find media", e))?;

        row.as_ref().map(Self::row_to_media).transpose()
    }

    async fn update(&self, media: Media) -> Result<Media, DomainError> {
        let result = sqlx::query(
            "UPDATE media SET article_id = ?, media_type = ?, url = ?, alt_text = ? WHERE id = ?",
        )
        .bind(media.article_id.to_string())
        .bind(media.media_type.as_str())
        .bind(&media.url)
        .bind(&media.alt_text)
        .bind(media.id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update media", e))?;

        if result.rows_affected() == 0 && self.find_by_id(media.id).await?.is_none() {
            return Err(DomainError::not_found("Media"));
        }
        Ok(media)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM media WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete media", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &MediaFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Media>, DomainError> {
        let pagination = pagination.normalized();

        let mut count: QueryBuilder<'_, MySql> = QueryBuilder::new("SELECT COUNT(*) AS count FROM media");
        Self::push_filter(&mut count, filter);
        let count = count
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count media", e))?;

        let mut list: QueryBuilder<'_, MySql> =
            QueryBuilder::new(format!("SELECT {} FROM media", MEDIA_COLUMNS));
        Self::push_filter(&mut list, filter);
        list.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rows = list
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list media", e))?;

        let media = rows.iter().map(Self::row_to_media).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(media, pagination, count_column(&count)?))
    }

    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<Media>, DomainError> {
        let query = format!(
            "SELECT {} FROM media WHERE article_id = ? ORDER BY created_at DESC, id DESC",
            MEDIA_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(article_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list article media", e))?;

        rows.iter().map(Self::row_to_media).collect()
    }
}
