//! MySQL repository implementations
//!
//! Queries are written by hand with `sqlx::query` and mapped from rows, so
//! the crate builds without a live database.

mod access_repository_impl;
mod article_repository_impl;
mod category_repository_impl;
mod comment_repository_impl;
mod media_repository_impl;
mod user_repository_impl;

pub use access_repository_impl::{
    MySqlPermissionRepository, MySqlRolePermissionRepository, MySqlRoleRepository,
    MySqlUserRoleRepository,
};
pub use article_repository_impl::MySqlArticleRepository;
pub use category_repository_impl::MySqlCategoryRepository;
pub use comment_repository_impl::MySqlCommentRepository;
pub use media_repository_impl::MySqlMediaRepository;
pub use user_repository_impl::MySqlUserRepository;

use sefr_core::errors::DomainError;
use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};
use uuid::Uuid;

use crate::InfrastructureError;

/// Wrap a driver error as a store failure
pub(crate) fn db_error(context: &str, error: sqlx::Error) -> DomainError {
    tracing::error!(error = %error, context, "Database query failed");
    InfrastructureError::Database(error).into()
}

/// Name of the unique key a failed insert or update collided with.
///
/// MySQL reports `Duplicate entry '...' for key 'users.uq_users_email'`; the
/// last `_`-separated segment of the key is the column.
pub(crate) fn duplicate_key(error: &sqlx::Error) -> Option<String> {
    let db = error.as_database_error()?;
    if !db.is_unique_violation() {
        return None;
    }
    let key = db.message().rsplit("for key ").next()?.trim_matches(|c| c == '\'' || c == '"');
    let key = key.rsplit('.').next().unwrap_or(key);
    Some(key.rsplit('_').next().unwrap_or(key).to_string())
}

/// Read one column, reporting the column name on failure
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(name)
        .map_err(|e| DomainError::store(format!("Failed to get {}: {}", name, e)))
}

pub(crate) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, DomainError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw).map_err(|e| DomainError::store(format!("Invalid UUID in {}: {}", name, e)))
}

/// Parse an enum stored as text
pub(crate) fn enum_column<T>(row: &MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = column(row, name)?;
    raw.parse().map_err(DomainError::store)
}

pub(crate) fn count_column(row: &MySqlRow) -> Result<u64, DomainError> {
    let count: i64 = column(row, "count")?;
    Ok(count.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_ignores_other_errors() {
        assert_eq!(duplicate_key(&sqlx::Error::RowNotFound), None);
        assert_eq!(duplicate_key(&sqlx::Error::PoolTimedOut), None);
    }

    #[test]
    fn test_db_error_is_store_failure() {
        let error = db_error("find user", sqlx::Error::PoolTimedOut);
        assert!(matches!(error, DomainError::Store { .. }));
    }
}
