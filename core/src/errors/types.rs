//! Error types for authentication, tokens and input validation
//!
//! Messages here are English only; the presentation layer owns the
//! localized texts.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists: {field}")]
    UserAlreadyExists { field: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    /// Wrong or stale code. Deliberately does not say which.
    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    #[error("Email already verified")]
    EmailAlreadyVerified,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid length: {field} (min: {min}, max: {max}, actual: {actual})")]
    InvalidLength {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Too short: {field} (min: {min})")]
    TooShort { field: String, min: usize },

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Password too short (min: {min})")]
    PasswordTooShort { min: usize },

    #[error("Password is entirely numeric")]
    PasswordEntirelyNumeric,

    #[error("Duplicate value: {field}")]
    DuplicateValue { field: String },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::RequiredField { field: field.into() }
    }

    /// Name of the offending field, when the error is about one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::RequiredField { field }
            | ValidationError::InvalidFormat { field }
            | ValidationError::InvalidLength { field, .. }
            | ValidationError::TooShort { field, .. }
            | ValidationError::DuplicateValue { field } => Some(field),
            ValidationError::InvalidEmail => Some("email"),
            ValidationError::InvalidUrl => Some("url"),
            ValidationError::PasswordTooShort { .. } | ValidationError::PasswordEntirelyNumeric => {
                Some("password")
            }
            ValidationError::BusinessRuleViolation { .. } => None,
        }
    }
}
