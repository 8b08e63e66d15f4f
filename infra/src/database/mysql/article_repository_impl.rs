//! MySQL implementation of the ArticleRepository trait, including the
//! `article_likes` and `article_views` tables.

use async_trait::async_trait;
use sefr_core::domain::entities::{Article, ArticleLike, ArticleStatus, ArticleView};
use sefr_core::errors::{DomainError, ValidationError};
use sefr_core::repositories::{ArticleFilter, ArticleRepository};
use sefr_shared::types::{PaginatedResponse, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use super::{column, count_column, db_error, duplicate_key, enum_column, uuid_column};

const ARTICLE_COLUMNS: &str = r#"
    id, title, slug, content, seo_title, seo_description, main_image,
    author_id, category_id, status, view_count, created_at, updated_at, published_at
"#;

pub struct MySqlArticleRepository {
    pool: MySqlPool,
}

impl MySqlArticleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_article(row: &MySqlRow) -> Result<Article, DomainError> {
        let status: ArticleStatus = enum_column(row, "status")?;
        Ok(Article {
            id: uuid_column(row, "id")?,
            title: column(row, "title")?,
            slug: column(row, "slug")?,
            content: column(row, "content")?,
            seo_title: column(row, "seo_title")?,
            seo_description: column(row, "seo_description")?,
            main_image: column(row, "main_image")?,
            author_id: uuid_column(row, "author_id")?,
            category_id: column(row, "category_id")?,
            status,
            view_count: column(row, "view_count")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            published_at: column(row, "published_at")?,
        })
    }

    fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &ArticleFilter) {
        builder.push(" WHERE 1 = 1");
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(category_id) = filter.category_id {
            builder.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(author_id) = filter.author_id {
            builder.push(" AND author_id = ").push_bind(author_id.to_string());
        }
    }

    async fn find_one(&self, filter: &str, value: String) -> Result<Option<Article>, DomainError> {
        let query = format!("SELECT {} FROM articles WHERE {} = ? LIMIT 1", ARTICLE_COLUMNS, filter);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find article", e))?;

        row.as_ref().map(Self::row_to_article).transpose()
    }

    async fn count_for(&self, table: &str, article_id: Uuid) -> Result<u64, DomainError> {
        let query = format!("SELECT COUNT(*) AS count FROM {} WHERE article_id = ?", table);
        let row = sqlx::query(&query)
            .bind(article_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count article activity", e))?;
        count_column(&row)
    }

    fn conflict(error: sqlx::Error) -> DomainError {
        match duplicate_key(&error) {
            Some(field) => ValidationError::DuplicateValue { field }.into(),
            None => db_error("write article", error),
        }
    }
}

#[async_trait]
impl ArticleRepository for MySqlArticleRepository {
    async fn create(&self, article: Article) -> Result<Article, DomainError> {
        let query = r#"
            INSERT INTO articles (
                id, title, slug, content, seo_title, seo_description, main_image,
                author_id, category_id, status, view_count, created_at, updated_at, published_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(article.id.to_string())
            .bind(&article.title)
            .bind(&article.slug)
            .bind(&article.content)
            .bind(&article.seo_title)
            .bind(&article.seo_description)
            .bind(&article.main_image)
            .bind(article.author_id.to_string())
            .bind(article.category_id)
            .bind(article.status.as_str())
            .bind(article.view_count)
            .bind(article.created_at)
            .bind(article.updated_at)
            .bind(article.published_at)
            .execute(&self.pool)
            .await
            .map_err(Self::conflict)?;

        Ok(article)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, DomainError> {
        self.find_one("slug", slug.to_string()).await
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM articles WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check article slug", e))?;
        Ok(count_column(&row)? > 0)
    }

    async fn update(&self, article: Article) -> Result<Article, DomainError> {
        // view_count is owned by record_view and never written here
        let query = r#"
            UPDATE articles SET
                title = ?, slug = ?, content = ?, seo_title = ?, seo_description = ?,
                main_image = ?, category_id = ?, status = ?, updated_at = ?, published_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&article.title)
            .bind(&article.slug)
            .bind(&article.content)
            .bind(&article.seo_title)
            .bind(&article.seo_description)
            .bind(&article.main_image)
            .bind(article.category_id)
            .bind(article.status.as_str())
            .bind(article.updated_at)
            .bind(article.published_at)
            .bind(article.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Self::conflict)?;

        if result.rows_affected() == 0 && self.find_by_id(article.id).await?.is_none() {
            return Err(DomainError::not_found("Article"));
        }
        Ok(article)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete article", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &ArticleFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Article>, DomainError> {
        let pagination = pagination.normalized();

        let mut count: QueryBuilder<'_, MySql> = QueryBuilder::new("SELECT COUNT(*) AS count FROM articles");
        Self::push_filter(&mut count, filter);
        let count = count
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count articles", e))?;

        let mut list: QueryBuilder<'_, MySql> =
            QueryBuilder::new(format!("SELECT {} FROM articles", ARTICLE_COLUMNS));
        Self::push_filter(&mut list, filter);
        list.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rows = list
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list articles", e))?;

        let articles = rows.iter().map(Self::row_to_article).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(articles, pagination, count_column(&count)?))
    }

    async fn add_like(&self, like: ArticleLike) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "INSERT IGNORE INTO article_likes (article_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(like.article_id.to_string())
        .bind(like.user_id.to_string())
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("like article", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_likes(&self, article_id: Uuid) -> Result<u64, DomainError> {
        self.count_for("article_likes", article_id).await
    }

    async fn record_view(&self, view: ArticleView) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin view transaction", e))?;

        let inserted = sqlx::query(
            "INSERT IGNORE INTO article_views (article_id, user_id, viewed_at) VALUES (?, ?, ?)",
        )
        .bind(view.article_id.to_string())
        .bind(view.user_id.to_string())
        .bind(view.viewed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("record view", e))?
        .rows_affected()
            == 1;

        if inserted {
            sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = ?")
                .bind(view.article_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("increment view count", e))?;
        }

        tx.commit().await.map_err(|e| db_error("commit view", e))?;
        Ok(inserted)
    }

    async fn count_views(&self, article_id: Uuid) -> Result<u64, DomainError> {
        self.count_for("article_views", article_id).await
    }
}
