//! SMTP delivery through lettre

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use sefr_core::errors::DomainResult;
use sefr_core::services::{MailMessage, MailTransport};
use sefr_shared::config::MailConfig;
use sefr_shared::utils::masking::mask_email;

use crate::InfrastructureError;

/// Implicit-TLS submission port
const SMTPS_PORT: u16 = 465;

pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    /// Build the transport. No connection is made until the first send.
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let from: Mailbox = config.from_address.parse().map_err(|e| {
            InfrastructureError::Config(format!("Invalid sender address {}: {}", config.from_address, e))
        })?;

        let builder = (if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        } else if config.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            // Plaintext, for a local relay
            Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host))
        })
        .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP relay {}: {}", config.host, e)))?;

        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));
        if config.has_credentials() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        tracing::info!(
            host = %config.host,
            port = config.port,
            starttls = config.starttls,
            "SMTP mail transport configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Compose the MIME message: plain text with an HTML alternative
    pub(crate) fn compose(&self, message: &MailMessage) -> Result<Message, InfrastructureError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| InfrastructureError::Mail(format!("Invalid recipient: {}", e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| InfrastructureError::Mail(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &MailMessage) -> DomainResult<()> {
        let email = self.compose(message)?;

        self.transport.send(email).await.map_err(|e| {
            tracing::error!(
                to = %mask_email(&message.to),
                error = %e,
                event = "smtp_send_failed",
                "SMTP delivery failed"
            );
            InfrastructureError::Mail(e.to_string())
        })?;

        tracing::debug!(to = %mask_email(&message.to), "SMTP delivery accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sefr_core::errors::DomainError;

    fn message(to: &str) -> MailMessage {
        MailMessage {
            to: to.to_string(),
            subject: "Verify your email - Sefr".to_string(),
            text_body: "Your code is 042917".to_string(),
            html_body: "<p>Your code is <strong>042917</strong></p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_compose_alternative_message() {
        let transport = SmtpMailTransport::new(&MailConfig::default()).unwrap();
        let email = transport.compose(&message("reader@example.com")).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();

        assert!(raw.contains("To: reader@example.com"));
        assert!(raw.contains("Subject: Verify your email - Sefr"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn test_invalid_sender_is_config_error() {
        let config = MailConfig {
            from_address: "not a mailbox".to_string(),
            ..MailConfig::default()
        };
        assert!(matches!(
            SmtpMailTransport::new(&config),
            Err(InfrastructureError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_transport_error() {
        let transport = SmtpMailTransport::new(&MailConfig::default()).unwrap();
        let err = transport.send(&message("nobody")).await.unwrap_err();
        assert!(matches!(err, DomainError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_transport_error() {
        let config = MailConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            starttls: false,
            timeout_seconds: 2,
            ..MailConfig::default()
        };
        let transport = SmtpMailTransport::new(&config).unwrap();
        let err = transport.send(&message("reader@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Transport { .. }));
    }
}
