use std::sync::Arc;

use sefr_shared::slug::{slug_candidates, slugify};
use sefr_shared::types::{PaginatedResponse, Pagination};
use sefr_shared::validation::char_length_between;

use crate::domain::entities::{Category, NewCategory};
use crate::domain::value_objects::CategoryInput;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::CategoryRepository;
use crate::services::clock::Clock;

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    clock: Arc<dyn Clock>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { categories, clock }
    }

    pub async fn list(
        &self,
        parent_id: Option<i64>,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<Category>> {
        self.categories.list(parent_id, pagination.normalized()).await
    }

    pub async fn get(&self, id: i64) -> DomainResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category"))
    }

    /// Create a category. A derived slug is suffixed until unique; an
    /// explicit slug that is taken is rejected.
    pub async fn create(&self, input: CategoryInput) -> DomainResult<Category> {
        let name = validate_name(&input.name)?;
        if let Some(parent_id) = input.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }
        let slug = self.resolve_slug(&name, input.slug.as_deref(), None).await?;

        let category = self
            .categories
            .create(NewCategory {
                name,
                slug,
                parent_id: input.parent_id,
                now: self.clock.now(),
            })
            .await?;
        tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn update(&self, id: i64, input: CategoryInput) -> DomainResult<Category> {
        let mut category = self.get(id).await?;
        let name = validate_name(&input.name)?;
        if let Some(parent_id) = input.parent_id {
            if parent_id == id {
                return Err(DomainError::Validation {
                    message: String::from("A category cannot be its own parent"),
                });
            }
            self.ensure_parent_exists(parent_id).await?;
        }

        let slug = match input.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => {
                self.resolve_slug(&name, Some(slug), Some(&category.slug)).await?
            }
            _ => category.slug.clone(),
        };

        category.name = name;
        category.slug = slug;
        category.parent_id = input.parent_id;
        category.updated_at = self.clock.now();
        self.categories.update(category).await
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        if !self.categories.delete(id).await? {
            return Err(DomainError::not_found("Category"));
        }
        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }

    async fn ensure_parent_exists(&self, parent_id: i64) -> DomainResult<()> {
        match self.categories.find_by_id(parent_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::Validation {
                message: format!("Parent category {} does not exist", parent_id),
            }),
        }
    }

    async fn resolve_slug(
        &self,
        name: &str,
        requested: Option<&str>,
        current: Option<&str>,
    ) -> DomainResult<String> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(requested) => {
                let slug = slugify(requested);
                if slug.is_empty() {
                    return Err(ValidationError::InvalidFormat {
                        field: String::from("slug"),
                    }
                    .into());
                }
                if current != Some(slug.as_str()) && self.categories.slug_exists(&slug).await? {
                    return Err(ValidationError::DuplicateValue {
                        field: String::from("slug"),
                    }
                    .into());
                }
                Ok(slug)
            }
            None => {
                let base = slugify(name);
                if base.is_empty() {
                    return Err(ValidationError::InvalidFormat {
                        field: String::from("name"),
                    }
                    .into());
                }
                for candidate in slug_candidates(&base) {
                    if !self.categories.slug_exists(&candidate).await? {
                        return Ok(candidate);
                    }
                }
                Ok(base)
            }
        }
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("name").into());
    }
    if !char_length_between(name, 1, 100) {
        return Err(ValidationError::InvalidLength {
            field: String::from("name"),
            min: 1,
            max: 100,
            actual: name.chars().count(),
        }
        .into());
    }
    Ok(name.to_string())
}
