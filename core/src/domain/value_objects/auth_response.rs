//! Outcomes of the authentication flows, handed to the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{TokenPair, User};

/// An authenticated user together with freshly issued tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// What happened to the verification email sent at registration.
///
/// Registration never fails because of mail; the status is reported back
/// so the client can offer a resend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum EmailStatus {
    Sent,
    /// Delivery disabled by configuration
    Skipped,
    Failed(String),
}

impl EmailStatus {
    /// Human readable status string as reported to clients
    pub fn describe(&self) -> String {
        match self {
            EmailStatus::Sent => String::from("sent"),
            EmailStatus::Skipped => String::from("skipped (dev mode)"),
            EmailStatus::Failed(reason) => format!("failed: {}", reason),
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, EmailStatus::Sent)
    }
}

/// Result of a successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub session: AuthSession,
    pub email_status: EmailStatus,
    /// Whole hours the issued code stays valid
    pub expires_in_hours: i64,
}

/// Result of submitting a verification code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyEmailOutcome {
    /// Code accepted; new tokens carry `is_verified = true`
    Verified(AuthSession),
    AlreadyVerified(User),
}

/// Result of asking for a new code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendOutcome {
    Sent { email: String, expires_in_hours: i64 },
    AlreadyVerified,
}

/// Pending code as exposed by the development-only lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugCode {
    Pending {
        email: String,
        code: String,
        expires_at: DateTime<Utc>,
    },
    AlreadyVerified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_status_describe() {
        assert_eq!(EmailStatus::Sent.describe(), "sent");
        assert_eq!(EmailStatus::Skipped.describe(), "skipped (dev mode)");
        assert_eq!(
            EmailStatus::Failed("connection refused".into()).describe(),
            "failed: connection refused"
        );
        assert!(EmailStatus::Sent.is_sent());
        assert!(!EmailStatus::Skipped.is_sent());
    }
}
