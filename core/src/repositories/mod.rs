//! Repository traits and their in-memory implementations.
//!
//! MySQL implementations live in the infra crate.

pub mod access;
pub mod article;
pub mod category;
pub mod comment;
pub mod media;
pub mod memory_store;
pub mod user;

#[cfg(test)]
mod tests;

pub use access::{
    InMemoryPermissionRepository, InMemoryRolePermissionRepository, InMemoryRoleRepository,
    InMemoryUserRoleRepository, PermissionRepository, RolePermissionFilter,
    RolePermissionRepository, RoleRepository, UserRoleFilter, UserRoleRepository,
};
pub use article::{ArticleFilter, ArticleRepository, InMemoryArticleRepository};
pub use category::{CategoryRepository, InMemoryCategoryRepository};
pub use comment::{CommentRepository, InMemoryCommentRepository};
pub use media::{InMemoryMediaRepository, MediaFilter, MediaRepository};
pub use memory_store::MemoryStore;
pub use user::{InMemoryUserRepository, UserRepository};
