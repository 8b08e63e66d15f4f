use chrono::{DateTime, Utc};
use sefr_core::domain::entities::TokenPair;
use sefr_core::value_objects::{AuthSession, EmailStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserResponse;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email
    #[validate(length(min = 1))]
    pub login: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub code: String,
}

/// Body of resend-verification and the debug code lookup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

/// Body of logout and token refresh
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterVerification {
    pub email_status: String,
    pub email_sent_to: String,
    pub expires_in_hours: i64,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub refresh: String,
    pub access: String,
    pub user: UserResponse,
    pub verification: RegisterVerification,
    pub message: String,
}

impl RegisterResponse {
    pub fn new(session: AuthSession, email_status: &EmailStatus, expires_in_hours: i64, message: String) -> Self {
        let verification = RegisterVerification {
            email_status: email_status.describe(),
            email_sent_to: session.user.email.clone(),
            expires_in_hours,
            is_verified: session.user.is_email_verified(),
        };
        let TokenPair {
            access_token,
            refresh_token,
            ..
        } = session.tokens;

        Self {
            refresh: refresh_token,
            access: access_token,
            user: UserResponse::from(&session.user),
            verification,
            message,
        }
    }
}

/// Tokens plus the user they were issued for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub refresh: String,
    pub access: String,
    pub access_expires_in: i64,
    pub user: UserResponse,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            refresh: session.tokens.refresh_token,
            access: session.tokens.access_token,
            access_expires_in: session.tokens.access_expires_in,
            user: UserResponse::from(&session.user),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailResponse {
    pub message: String,
    /// `success` or `already_verified`
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendVerification {
    pub email_status: String,
    pub email_sent_to: String,
    pub expires_in_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<ResendVerification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Answer of the development-only direct verification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectVerifyResponse {
    Verified {
        message: String,
        refresh: String,
        access: String,
        user: UserResponse,
    },
    AlreadyVerified {
        message: String,
        is_verified: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DebugCodeResponse {
    Pending {
        warning: String,
        email: String,
        code: String,
        expires_at: DateTime<Utc>,
    },
    AlreadyVerified {
        message: String,
        is_verified: bool,
    },
}
