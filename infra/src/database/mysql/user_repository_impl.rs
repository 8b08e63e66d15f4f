//! MySQL implementation of the UserRepository trait.
//!
//! The verification state is flattened into `is_verified`,
//! `verification_code` and `verification_code_issued_at`, and rebuilt with
//! [`VerificationState::from_parts`] on read.

use async_trait::async_trait;
use sefr_core::domain::entities::user::User;
use sefr_core::domain::entities::VerificationState;
use sefr_core::errors::{AuthError, DomainError};
use sefr_core::repositories::UserRepository;
use sefr_shared::types::{PaginatedResponse, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{column, count_column, db_error, duplicate_key, uuid_column};

const USER_COLUMNS: &str = r#"
    id, username, email, first_name, last_name, password_hash,
    is_active, is_staff, is_verified, verification_code, verification_code_issued_at,
    created_at, updated_at, last_login_at
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let verification = VerificationState::from_parts(
            column(row, "verification_code")?,
            column(row, "verification_code_issued_at")?,
            column(row, "is_verified")?,
        );

        Ok(User {
            id: uuid_column(row, "id")?,
            username: column(row, "username")?,
            email: column(row, "email")?,
            first_name: column(row, "first_name")?,
            last_name: column(row, "last_name")?,
            password_hash: column(row, "password_hash")?,
            is_active: column(row, "is_active")?,
            is_staff: column(row, "is_staff")?,
            verification,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            last_login_at: column(row, "last_login_at")?,
        })
    }

    async fn find_one(&self, filter: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = ? LIMIT 1", USER_COLUMNS, filter);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    fn conflict(error: sqlx::Error) -> DomainError {
        match duplicate_key(&error) {
            Some(field) => AuthError::UserAlreadyExists { field }.into(),
            None => db_error("write user", error),
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email.to_string()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username.to_string()).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check email", e))?;
        Ok(count_column(&row)? > 0)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check username", e))?;
        Ok(count_column(&row)? > 0)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, username, email, first_name, last_name, password_hash,
                is_active, is_staff, is_verified, verification_code, verification_code_issued_at,
                created_at, updated_at, last_login_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(user.is_active)
            .bind(user.is_staff)
            .bind(user.verification.is_verified())
            .bind(user.verification.code())
            .bind(user.verification.issued_at())
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .execute(&self.pool)
            .await
            .map_err(Self::conflict)?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users SET
                username = ?, email = ?, first_name = ?, last_name = ?, password_hash = ?,
                is_active = ?, is_staff = ?, is_verified = ?,
                verification_code = ?, verification_code_issued_at = ?,
                updated_at = ?, last_login_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(user.is_active)
            .bind(user.is_staff)
            .bind(user.verification.is_verified())
            .bind(user.verification.code())
            .bind(user.verification.issued_at())
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Self::conflict)?;

        // MySQL counts changed rows, so an identical write also reports zero
        if result.rows_affected() == 0 && self.find_by_id(user.id).await?.is_none() {
            return Err(DomainError::not_found("User"));
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResponse<User>, DomainError> {
        let pagination = pagination.normalized();

        let count = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count users", e))?;

        let query = format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?",
            USER_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list users", e))?;

        let users = rows.iter().map(Self::row_to_user).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(users, pagination, count_column(&count)?))
    }
}
