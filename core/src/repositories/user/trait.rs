//! User repository trait defining the interface for user persistence.
//!
//! Email addresses are stored lowercased by the services, so lookups here
//! compare exactly.

use async_trait::async_trait;
use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Check if an email address is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Check if a username is already taken
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;

    /// Create a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Email or username taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Persist every field of an existing user, including its verification state
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError::NotFound)` - No such user
    /// * `Err(DomainError::Store)` - The write failed; nothing was changed
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user together with their articles, comments, likes and views
    ///
    /// # Returns
    /// * `Ok(true)` - User was deleted
    /// * `Ok(false)` - User not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// List users ordered by join date, newest first
    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<User>, DomainError>;
}
