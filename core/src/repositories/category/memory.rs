use std::sync::Arc;

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};

use crate::domain::entities::{Category, NewCategory};
use crate::errors::{DomainError, ValidationError};
use crate::repositories::memory_store::{MemoryStore, Tables};

use super::trait_::CategoryRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn check_unique(tables: &Tables, id: i64, name: &str, slug: &str) -> Result<(), DomainError> {
    for other in tables.categories.values().filter(|c| c.id != id) {
        if other.name == name {
            return Err(ValidationError::DuplicateValue { field: "name".into() }.into());
        }
        if other.slug == slug {
            return Err(ValidationError::DuplicateValue { field: "slug".into() }.into());
        }
    }
    Ok(())
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        check_unique(&tables, 0, &category.name, &category.slug)?;

        let id = tables.next_id();
        let category = category.into_category(id);
        tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        Ok(tables.categories.values().find(|c| c.name == name).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        Ok(tables.categories.values().any(|c| c.slug == slug))
    }

    async fn update(&self, category: Category) -> Result<Category, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(DomainError::not_found("Category"));
        }
        check_unique(&tables, category.id, &category.name, &category.slug)?;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.write().await.cascade_delete_category(id))
    }

    async fn list(
        &self,
        parent_id: Option<i64>,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Category>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| parent_id.map_or(true, |p| c.parent_id == Some(p)))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(PaginatedResponse::from_vec(categories, pagination))
    }
}
