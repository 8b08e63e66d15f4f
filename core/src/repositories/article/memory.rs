use std::sync::Arc;

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{Article, ArticleLike, ArticleView};
use crate::errors::{DomainError, ValidationError};
use crate::repositories::memory_store::MemoryStore;

use super::trait_::{ArticleFilter, ArticleRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryArticleRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn create(&self, article: Article) -> Result<Article, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if tables.articles.values().any(|a| a.slug == article.slug) {
            return Err(ValidationError::DuplicateValue { field: "slug".into() }.into());
        }
        tables.articles.insert(article.id, article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.read().await.articles.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        Ok(tables.articles.values().find(|a| a.slug == slug).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_slug(slug).await?.is_some())
    }

    async fn update(&self, article: Article) -> Result<Article, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        if !tables.articles.contains_key(&article.id) {
            return Err(DomainError::not_found("Article"));
        }
        if tables
            .articles
            .values()
            .any(|a| a.id != article.id && a.slug == article.slug)
        {
            return Err(ValidationError::DuplicateValue { field: "slug".into() }.into());
        }
        tables.articles.insert(article.id, article.clone());
        Ok(article)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.store.check()?;
        Ok(self.store.tables.write().await.cascade_delete_article(id))
    }

    async fn list(
        &self,
        filter: &ArticleFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Article>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut articles: Vec<Article> = tables
            .articles
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(PaginatedResponse::from_vec(articles, pagination))
    }

    async fn add_like(&self, like: ArticleLike) -> Result<bool, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        let key = (like.article_id, like.user_id);
        if tables.likes.contains_key(&key) {
            return Ok(false);
        }
        tables.likes.insert(key, like);
        Ok(true)
    }

    async fn count_likes(&self, article_id: Uuid) -> Result<u64, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        Ok(tables.likes.keys().filter(|(a, _)| *a == article_id).count() as u64)
    }

    async fn record_view(&self, view: ArticleView) -> Result<bool, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        let key = (view.article_id, view.user_id);
        if tables.views.contains_key(&key) {
            return Ok(false);
        }
        match tables.articles.get_mut(&view.article_id) {
            Some(article) => article.view_count += 1,
            None => return Err(DomainError::not_found("Article")),
        }
        tables.views.insert(key, view);
        Ok(true)
    }

    async fn count_views(&self, article_id: Uuid) -> Result<u64, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        Ok(tables.views.keys().filter(|(a, _)| *a == article_id).count() as u64)
    }
}
