//! Category repository trait

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};

use crate::domain::entities::{Category, NewCategory};
use crate::errors::DomainError;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category; the store assigns its id.
    /// A taken name or slug yields `ValidationError::DuplicateValue`.
    async fn create(&self, category: NewCategory) -> Result<Category, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError>;

    async fn update(&self, category: Category) -> Result<Category, DomainError>;

    /// Delete a category, its subcategories and their articles
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// List categories ordered by name, optionally only the children of `parent_id`
    async fn list(
        &self,
        parent_id: Option<i64>,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Category>, DomainError>;
}
