//! Content services: categories, articles (with likes and views), comments
//! and media.
//!
//! Every operation takes the acting [`User`](crate::domain::entities::User);
//! changes to an owned resource require the owner or a staff account.

mod article;
mod category;
mod comment;
mod media;

#[cfg(test)]
mod tests;

pub use article::ArticleService;
pub use category::CategoryService;
pub use comment::{CommentService, MIN_COMMENT_LENGTH};
pub use media::MediaService;

use crate::domain::entities::User;
use crate::errors::{DomainError, DomainResult};

pub(crate) fn ensure_can_modify(actor: &User, owner_id: uuid::Uuid, what: &str) -> DomainResult<()> {
    if actor.can_modify(owner_id) {
        return Ok(());
    }
    tracing::warn!(
        user_id = %actor.id,
        owner_id = %owner_id,
        resource = what,
        event = "permission_denied",
        "User may not modify resource"
    );
    Err(DomainError::forbidden(format!(
        "Only the author or staff may modify this {}",
        what
    )))
}
