//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Access and refresh token generation and verification
//! - Token revocation through a blacklist keyed by JWT ID

mod blacklist;
mod service;

#[cfg(test)]
mod tests;

pub use blacklist::{InMemoryTokenBlacklist, TokenBlacklist};
pub use service::TokenService;
