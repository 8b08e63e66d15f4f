//! Shared utilities and common types for the Sefr server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the layered loader
//! - Error response structures
//! - Utility functions (slugs, email masking, validators)
//! - Pagination and response envelopes

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    LoggingConfig, MailConfig, ServerConfig, StorageBackend, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{HealthResponse, HealthStatus, Language, PaginatedResponse, Pagination};
pub use utils::{masking, slug, validation};
