//! Unit tests for domain error types

use crate::errors::{AuthError, DomainError, TokenError, ValidationError};

#[test]
fn test_bridged_errors_keep_their_message() {
    let error: DomainError = AuthError::InvalidOrExpiredCode.into();
    assert_eq!(error.to_string(), "Invalid or expired verification code");

    let error: DomainError = TokenError::TokenRevoked.into();
    assert!(matches!(error, DomainError::Token(TokenError::TokenRevoked)));
}

#[test]
fn test_server_error_classification() {
    assert!(DomainError::store("connection reset").is_server_error());
    assert!(DomainError::Transport { message: "smtp 421".into() }.is_server_error());
    assert!(!DomainError::not_found("article").is_server_error());
    assert!(!DomainError::from(AuthError::InvalidCredentials).is_server_error());
}

#[test]
fn test_validation_error_field() {
    let error = ValidationError::InvalidLength {
        field: "title".to_string(),
        min: 5,
        max: 200,
        actual: 3,
    };
    assert_eq!(error.field(), Some("title"));
    assert!(error.to_string().contains("min: 5"));
    assert_eq!(ValidationError::PasswordEntirelyNumeric.field(), Some("password"));
    assert_eq!(ValidationError::required("email").field(), Some("email"));
}
