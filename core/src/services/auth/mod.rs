//! Authentication service module
//!
//! This module provides the account flows:
//! - Registration with email verification
//! - Login by email or username
//! - Verification code submission and resend
//! - Token refresh and logout

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub(crate) use password::{hash_password, verify_password};
pub use service::{AuthService, Registration};
