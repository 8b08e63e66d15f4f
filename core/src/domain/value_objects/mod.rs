//! Value objects representing immutable domain concepts.

pub mod access;
pub mod auth_response;
pub mod content;

pub use access::{
    PermissionChanges, PermissionInput, RoleChanges, RoleInput, RolePermissionChanges,
    UserRoleChanges,
};
pub use auth_response::{
    AuthSession, DebugCode, EmailStatus, RegistrationOutcome, ResendOutcome, VerifyEmailOutcome,
};
pub use content::{
    ArticleDetail, CategoryInput, CommentInput, LikeOutcome, MediaChanges, MediaInput,
    UserChanges,
};
