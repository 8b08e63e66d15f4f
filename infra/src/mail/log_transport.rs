//! Mail transport that writes to the log instead of delivering

use std::sync::Mutex;

use async_trait::async_trait;
use sefr_core::errors::DomainResult;
use sefr_core::services::{MailMessage, MailTransport};
use sefr_shared::utils::masking::mask_email;

/// Logs every message and keeps it for inspection
#[derive(Debug, Default)]
pub struct LogMailTransport {
    sent: Mutex<Vec<MailMessage>>,
}

impl LogMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages handed to this transport so far, oldest first
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// The most recent message addressed to `to`
    pub fn last_to(&self, to: &str) -> Option<MailMessage> {
        self.sent().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, message: &MailMessage) -> DomainResult<()> {
        tracing::info!(
            to = %mask_email(&message.to),
            subject = %message.subject,
            event = "mail_logged",
            "Mail delivery disabled; message written to log"
        );
        tracing::debug!(body = %message.text_body, "Logged mail body");

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str, code: &str) -> MailMessage {
        MailMessage {
            to: to.to_string(),
            subject: "Verify your email - Sefr".to_string(),
            text_body: format!("Your code is {}", code),
            html_body: format!("<p>{}</p>", code),
        }
    }

    #[tokio::test]
    async fn test_records_messages_in_order() {
        let transport = LogMailTransport::new();
        transport.send(&message("a@example.com", "111111")).await.unwrap();
        transport.send(&message("b@example.com", "222222")).await.unwrap();
        transport.send(&message("a@example.com", "333333")).await.unwrap();

        assert_eq!(transport.sent().len(), 3);
        let last = transport.last_to("a@example.com").unwrap();
        assert!(last.text_body.contains("333333"));
        assert!(transport.last_to("c@example.com").is_none());
    }
}
