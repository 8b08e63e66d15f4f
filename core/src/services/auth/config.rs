//! Configuration for the authentication service

use sefr_shared::config::AppConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Minimum password length in characters
    pub min_password_length: usize,
    /// Send verification mail; when false the send is reported as skipped
    pub mail_delivery_enabled: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            min_password_length: 8,
            mail_delivery_enabled: false,
        }
    }
}

impl AuthServiceConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            bcrypt_cost: config.auth.bcrypt_cost,
            min_password_length: config.auth.min_password_length,
            mail_delivery_enabled: config.mail.delivery_enabled,
        }
    }
}
