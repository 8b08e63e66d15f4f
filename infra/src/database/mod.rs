//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management and health checks
//! - Embedded migrations (`infra/migrations`)
//! - Repository implementations for every core repository trait

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlArticleRepository, MySqlCategoryRepository, MySqlCommentRepository,
    MySqlMediaRepository, MySqlPermissionRepository, MySqlRolePermissionRepository,
    MySqlRoleRepository, MySqlUserRepository, MySqlUserRoleRepository,
};
