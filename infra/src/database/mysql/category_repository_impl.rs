//! MySQL implementation of the CategoryRepository trait.

use async_trait::async_trait;
use sefr_core::domain::entities::{Category, NewCategory};
use sefr_core::errors::{DomainError, ValidationError};
use sefr_core::repositories::CategoryRepository;
use sefr_shared::types::{PaginatedResponse, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use super::{column, count_column, db_error, duplicate_key};

const CATEGORY_COLUMNS: &str = "id, name, slug, parent_id, created_at, updated_at";

pub struct MySqlCategoryRepository {
    pool: MySqlPool,
}

impl MySqlCategoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_category(row: &MySqlRow) -> Result<Category, DomainError> {
        Ok(Category {
            id: column(row, "id")?,
            name: column(row, "name")?,
            slug: column(row, "slug")?,
            parent_id: column(row, "parent_id")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }

    fn conflict(error: sqlx::Error) -> DomainError {
        match duplicate_key(&error) {
            Some(field) => ValidationError::DuplicateValue { field }.into(),
            None => db_error("write category", error),
        }
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
        let result = sqlx::query(
            "INSERT INTO categories (name, slug, parent_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.parent_id)
        .bind(category.now)
        .bind(category.now)
        .execute(&self.pool)
        .await
        .map_err(Self::conflict)?;

        Ok(category.into_category(result.last_insert_id() as i64))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        let query = format!("SELECT {} FROM categories WHERE id = ?", CATEGORY_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find category", e))?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        let query = format!("SELECT {} FROM categories WHERE name = ?", CATEGORY_COLUMNS);
        let row = sqlx::query(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find category", e))?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check category slug", e))?;
        Ok(count_column(&row)? > 0)
    }

    async fn update(&self, category: Category) -> Result<Category, DomainError> {
        let result = sqlx::query(
            "UPDATE categories SET name = ?, slug = ?, parent_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.parent_id)
        .bind(category.updated_at)
        .bind(category.id)
        .execute(&self.pool)
        .await
        .map_err(Self::conflict)?;

        if result.rows_affected() == 0 && self.find_by_id(category.id).await?.is_none() {
            return Err(DomainError::not_found("Category"));
        }
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        // Subcategories and their articles go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete category", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        parent_id: Option<i64>,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Category>, DomainError> {
        let pagination = pagination.normalized();
        let filter = if parent_id.is_some() { "WHERE parent_id = ?" } else { "" };

        let count_query = format!("SELECT COUNT(*) AS count FROM categories {}", filter);
        let mut count = sqlx::query(&count_query);
        if let Some(parent_id) = parent_id {
            count = count.bind(parent_id);
        }
        let count = count
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count categories", e))?;

        let list_query = format!(
            "SELECT {} FROM categories {} ORDER BY name LIMIT ? OFFSET ?",
            CATEGORY_COLUMNS, filter
        );
        let mut rows = sqlx::query(&list_query);
        if let Some(parent_id) = parent_id {
            rows = rows.bind(parent_id);
        }
        let rows = rows
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list categories", e))?;

        let categories = rows.iter().map(Self::row_to_category).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(categories, pagination, count_column(&count)?))
    }
}
