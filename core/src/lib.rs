//! # Sefr Core
//!
//! Core business logic and domain layer for the Sefr backend.
//! This crate contains domain entities, business services, repository interfaces
//! (with in-memory implementations), and error types that form the foundation
//! of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{entities, value_objects};
pub use errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
