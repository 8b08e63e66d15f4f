//! Outbound mail configuration

use serde::{Deserialize, Serialize};

/// SMTP settings for verification mail
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Actually deliver mail. When false, mail is written to the log instead
    /// and registration reports the send as skipped.
    #[serde(default)]
    pub delivery_enabled: bool,

    /// SMTP relay host
    pub host: String,

    /// SMTP port
    pub port: u16,

    /// SMTP username
    #[serde(default)]
    pub username: String,

    /// SMTP password
    #[serde(default)]
    pub password: String,

    /// Use STARTTLS (port 587) rather than implicit TLS
    #[serde(default = "default_starttls")]
    pub starttls: bool,

    /// Sender mailbox, e.g. `Sefr <noreply@sefr.dev>`
    pub from_address: String,

    /// SMTP command timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            delivery_enabled: false,
            host: String::from("localhost"),
            port: 587,
            username: String::new(),
            password: String::new(),
            starttls: default_starttls(),
            from_address: String::from("Sefr <noreply@sefr.dev>"),
            timeout_seconds: default_timeout(),
        }
    }
}

impl MailConfig {
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

fn default_starttls() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}
