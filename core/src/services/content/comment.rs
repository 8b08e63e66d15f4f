use std::sync::Arc;

use sefr_shared::types::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{Comment, NewComment, User};
use crate::domain::value_objects::CommentInput;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{ArticleRepository, CommentRepository};
use crate::services::clock::Clock;

use super::ensure_can_modify;

/// Shortest accepted comment, in characters after trimming
pub const MIN_COMMENT_LENGTH: usize = 10;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    articles: Arc<dyn ArticleRepository>,
    clock: Arc<dyn Clock>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        articles: Arc<dyn ArticleRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            articles,
            clock,
        }
    }

    pub async fn list(
        &self,
        article_id: Option<Uuid>,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<Comment>> {
        self.comments.list(article_id, pagination.normalized()).await
    }

    pub async fn get(&self, id: i64) -> DomainResult<Comment> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment"))
    }

    /// Post a comment; a reply must target a comment on the same article.
    /// New comments await approval.
    pub async fn create(&self, author: &User, input: CommentInput) -> DomainResult<Comment> {
        let content = validate_content(&input.content)?;

        if self.articles.find_by_id(input.article_id).await?.is_none() {
            return Err(DomainError::Validation {
                message: format!("Article {} does not exist", input.article_id),
            });
        }
        if let Some(parent_id) = input.parent_id {
            let parent = self.comments.find_by_id(parent_id).await?;
            match parent {
                Some(parent) if parent.article_id == input.article_id => {}
                Some(_) => {
                    return Err(DomainError::Validation {
                        message: String::from("Reply must belong to the same article"),
                    })
                }
                None => {
                    return Err(DomainError::Validation {
                        message: format!("Parent comment {} does not exist", parent_id),
                    })
                }
            }
        }

        let comment = self
            .comments
            .create(NewComment {
                article_id: input.article_id,
                author_id: author.id,
                content,
                parent_id: input.parent_id,
                now: self.clock.now(),
            })
            .await?;
        tracing::info!(
            comment_id = comment.id,
            article_id = %comment.article_id,
            author_id = %author.id,
            "Comment created"
        );
        Ok(comment)
    }

    /// Edit the text of a comment
    pub async fn update(&self, actor: &User, id: i64, content: &str) -> DomainResult<Comment> {
        let mut comment = self.get(id).await?;
        ensure_can_modify(actor, comment.author_id, "comment")?;
        comment.content = validate_content(content)?;
        comment.updated_at = self.clock.now();
        self.comments.update(comment).await
    }

    /// Delete a comment and its replies
    pub async fn delete(&self, actor: &User, id: i64) -> DomainResult<()> {
        let comment = self.get(id).await?;
        ensure_can_modify(actor, comment.author_id, "comment")?;
        self.comments.delete(id).await?;
        Ok(())
    }
}

fn validate_content(content: &str) -> DomainResult<String> {
    let content = content.trim();
    let length = content.chars().count();
    if length < MIN_COMMENT_LENGTH {
        return Err(ValidationError::TooShort {
            field: String::from("content"),
            min: MIN_COMMENT_LENGTH,
        }
        .into());
    }
    Ok(content.to_string())
}
