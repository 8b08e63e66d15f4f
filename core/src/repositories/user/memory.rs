//! In-memory implementation of UserRepository

use std::sync::Arc;

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::memory_store::MemoryStore;

use super::trait_::UserRepository;

/// User repository over a [`MemoryStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUserRepository {
    /// Create a repository with its own empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository sharing `store` with other repositories
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::UserAlreadyExists { field: "email".into() }.into());
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AuthError::UserAlreadyExists { field: "username".into() }.into());
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;

        if !tables.users.contains_key(&user.id) {
            return Err(DomainError::not_found("User"));
        }
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(AuthError::UserAlreadyExists { field: "username".into() }.into());
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.store.check()?;
        let mut tables = self.store.tables.write().await;
        Ok(tables.cascade_delete_user(id))
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<User>, DomainError> {
        self.store.check()?;
        let tables = self.store.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.username.cmp(&b.username)));
        Ok(PaginatedResponse::from_vec(users, pagination))
    }
}
