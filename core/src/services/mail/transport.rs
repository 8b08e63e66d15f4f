use async_trait::async_trait;

use crate::errors::DomainResult;

/// A composed message with plain text and HTML alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Delivers composed mail.
///
/// Implementations report delivery failures as `DomainError::Transport`.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> DomainResult<()>;
}
