//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// The record store rejected or failed a read/write
    #[error("Store error: {message}")]
    Store { message: String },

    /// The mail transport failed to deliver
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn store(message: impl std::fmt::Display) -> Self {
        DomainError::Store {
            message: message.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        DomainError::Forbidden {
            message: message.into(),
        }
    }

    /// Server-side failures (store, transport, internal) as opposed to caller mistakes
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            DomainError::Store { .. } | DomainError::Transport { .. } | DomainError::Internal { .. }
        ) || matches!(self, DomainError::Token(TokenError::TokenGenerationFailed))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
