use std::sync::Arc;

use sefr_shared::types::{PaginatedResponse, Pagination};
use sefr_shared::validation::{check_password, is_valid_username, not_blank, PasswordIssue};
use uuid::Uuid;

use crate::domain::entities::User;
use crate::domain::value_objects::UserChanges;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::auth::{hash_password, AuthServiceConfig};
use crate::services::clock::Clock;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    config: AuthServiceConfig,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>, config: AuthServiceConfig) -> Self {
        Self {
            users,
            clock,
            config,
        }
    }

    pub async fn list(&self, pagination: Pagination) -> DomainResult<PaginatedResponse<User>> {
        self.users.list(pagination.normalized()).await
    }

    /// # Errors
    /// * `AuthError::UserNotFound` - no such user
    pub async fn get(&self, id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Apply profile changes. Only the user themself or staff may do this.
    pub async fn update(&self, actor: &User, id: Uuid, changes: UserChanges) -> DomainResult<User> {
        let mut user = self.get(id).await?;
        if !actor.can_modify(user.id) {
            return Err(AuthError::InsufficientPermissions.into());
        }

        if let Some(first_name) = changes.first_name {
            user.first_name = required_text("first_name", &first_name)?;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = required_text("last_name", &last_name)?;
        }
        if let Some(username) = changes.username {
            let username = username.trim().to_string();
            if !is_valid_username(&username) {
                return Err(ValidationError::InvalidFormat {
                    field: String::from("username"),
                }
                .into());
            }
            user.username = username;
        }
        if let Some(password) = changes.password {
            let min = self.config.min_password_length;
            check_password(&password, min).map_err(|issue| match issue {
                PasswordIssue::TooShort => ValidationError::PasswordTooShort { min },
                PasswordIssue::EntirelyNumeric => ValidationError::PasswordEntirelyNumeric,
            })?;
            user.password_hash = hash_password(&password, self.config.bcrypt_cost).await?;
        }

        user.touch(self.clock.now());
        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, actor_id = %actor.id, "User profile updated");
        Ok(user)
    }

    /// Delete an account along with everything it authored
    pub async fn delete(&self, actor: &User, id: Uuid) -> DomainResult<()> {
        let user = self.get(id).await?;
        if !actor.can_modify(user.id) {
            return Err(AuthError::InsufficientPermissions.into());
        }
        if !self.users.delete(user.id).await? {
            return Err(DomainError::from(AuthError::UserNotFound));
        }
        tracing::info!(user_id = %user.id, actor_id = %actor.id, "User deleted");
        Ok(())
    }
}

fn required_text(field: &str, value: &str) -> DomainResult<String> {
    if !not_blank(value) {
        return Err(ValidationError::required(field).into());
    }
    Ok(value.trim().to_string())
}
