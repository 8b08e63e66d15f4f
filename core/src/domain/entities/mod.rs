//! Domain entities representing core business objects.

pub mod access;
pub mod article;
pub mod category;
pub mod comment;
pub mod media;
pub mod token;
pub mod user;
pub mod verification;

// Re-export commonly used types
pub use access::{NewPermission, NewRole, Permission, Role, RolePermission, UserRole};
pub use article::{Article, ArticleDraft, ArticleLike, ArticleStatus, ArticleView};
pub use category::{Category, NewCategory};
pub use comment::{Comment, NewComment};
pub use media::{Media, MediaType, NewMedia};
pub use token::{Claims, ClaimsTemplate, TokenPair, TokenType};
pub use user::User;
pub use verification::{ConsumeOutcome, PendingCode, VerificationState};
