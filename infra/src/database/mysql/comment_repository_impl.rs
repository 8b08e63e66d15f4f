//! MySQL implementation of the CommentRepository trait.

use async_trait::async_trait;
use sefr_core::domain::entities::{Comment, NewComment};
use sefr_core::errors::DomainError;
use sefr_core::repositories::CommentRepository;
use sefr_shared::types::{PaginatedResponse, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{column, count_column, db_error, uuid_column};

const COMMENT_COLUMNS: &str =
    "id, article_id, author_id, content, parent_id, is_approved, created_at, updated_at";

pub struct MySqlCommentRepository {
    pool: MySqlPool,
}

impl MySqlCommentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_comment(row: &MySqlRow) -> Result<Comment, DomainError> {
        Ok(Comment {
            id: column(row, "id")?,
            article_id: uuid_column(row, "article_id")?,
            author_id: uuid_column(row, "author_id")?,
            content: column(row, "content")?,
            parent_id: column(row, "parent_id")?,
            is_approved: column(row, "is_approved")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl CommentRepository for MySqlCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO comments (article_id, author_id, content, parent_id, is_approved, created_at, updated_at)
            VALUES (?, ?, ?, ?, FALSE, ?, ?)
            "#,
        )
        .bind(comment.article_id.to_string())
        .bind(comment.author_id.to_string())
        .bind(&comment.content)
        .bind(comment.parent_id)
        .bind(comment.now)
        .bind(comment.now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create comment", e))?;

        Ok(comment.into_comment(result.last_insert_id() as i64))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let query = format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find comment", e))?;

        row.as_ref().map(Self::row_to_comment).transpose()
    }

    async fn update(&self, comment: Comment) -> Result<Comment, DomainError> {
        let result = sqlx::query(
            "UPDATE comments SET content = ?, is_approved = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&comment.content)
        .bind(comment.is_approved)
        .bind(comment.updated_at)
        .bind(comment.id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update comment", e))?;

        if result.rows_affected() == 0 && self.find_by_id(comment.id).await?.is_none() {
            return Err(DomainError::not_found("Comment"));
        }
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        // Replies go with it through fk_comments_parent
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete comment", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        article_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Comment>, DomainError> {
        let pagination = pagination.normalized();
        let filter = if article_id.is_some() { "WHERE article_id = ?" } else { "" };

        let count_query = format!("SELECT COUNT(*) AS count FROM comments {}", filter);
        let mut count = sqlx::query(&count_query);
        if let Some(article_id) = article_id {
            count = count.bind(article_id.to_string());
        }
        let count = count
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count comments", e))?;

        let list_query = format!(
            "SELECT {} FROM comments {} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            COMMENT_COLUMNS, filter
        );
        let mut rows = sqlx::query(&list_query);
        if let Some(article_id) = article_id {
            rows = rows.bind(article_id.to_string());
        }
        let rows = rows
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list comments", e))?;

        let comments = rows.iter().map(Self::row_to_comment).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(comments, pagination, count_column(&count)?))
    }

    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let query = format!(
            "SELECT {} FROM comments WHERE article_id = ? ORDER BY created_at DESC, id DESC",
            COMMENT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(article_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list article comments", e))?;

        rows.iter().map(Self::row_to_comment).collect()
    }
}
