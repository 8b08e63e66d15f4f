//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT and password hashing
//! - `cache` - Redis connection for the token blacklist
//! - `database` - storage backend and MySQL pool
//! - `environment` - environment detection and logging configuration
//! - `mail` - SMTP delivery
//! - `server` - HTTP server and CORS
//! - `verification` - email verification code length and lifetime
//!
//! [`AppConfig::load`] layers built-in defaults, an optional
//! `config.<environment>.toml`, `SEFR__SECTION__KEY` variables, and finally
//! the flat variables deployments already set (`DATABASE_URL`, `JWT_SECRET`,
//! `EMAIL_HOST`, ...).

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod mail;
pub mod server;
pub mod verification;

use std::path::Path;

use config::{Config, ConfigError, Environment as EnvSource, File, FileFormat};
use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, JwtConfig};
pub use cache::CacheConfig;
pub use database::{DatabaseConfig, StorageBackend};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::MailConfig;
pub use server::{CorsConfig, ServerConfig};
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Verification code configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Mail configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        let cors = if environment.is_development() {
            CorsConfig::development()
        } else {
            CorsConfig::default()
        };

        Self {
            environment,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            verification: VerificationConfig::default(),
            mail: MailConfig::default(),
            cache: CacheConfig::default(),
            cors,
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Configuration for tests: in-memory storage, no Redis, no mail delivery,
    /// cheap password hashing.
    pub fn testing() -> Self {
        let mut config = Self::for_environment(Environment::Development);
        config.database = DatabaseConfig::in_memory();
        config.cache.enabled = false;
        config.mail.delivery_enabled = false;
        config.auth.jwt = JwtConfig::new("test-secret-key-for-sefr");
        config.auth.bcrypt_cost = 4;
        config
    }

    /// Load configuration for the environment named by `SEFR_ENV`, reading
    /// the environment file from the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Environment::from_env(), Path::new("."))
    }

    /// Load configuration with the environment file taken from `config_dir`
    pub fn load_from(environment: Environment, config_dir: &Path) -> Result<Self, ConfigError> {
        let defaults = Self::for_environment(environment);
        let file_path = config_dir.join(environment.config_file());

        let settings = Config::builder()
            .add_source(Config::try_from(&defaults)?)
            .add_source(File::from(file_path).format(FileFormat::Toml).required(false))
            .add_source(
                EnvSource::with_prefix("SEFR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.environment = environment;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the services cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.verification.validate().map_err(ConfigError::Message)
    }

    /// Apply the flat, unprefixed variables on top of the layered settings
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.database.backend = backend.parse().map_err(ConfigError::Message)?;
        }
        if let Some(url) = lookup("REDIS_URL") {
            self.cache.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt.secret = secret;
        }
        if let Some(length) = lookup("VERIFICATION_CODE_LENGTH") {
            self.verification.code_length = parse_value("VERIFICATION_CODE_LENGTH", &length)?;
        }
        if let Some(timeout) = lookup("EMAIL_VERIFICATION_TIMEOUT") {
            self.verification.code_timeout_seconds =
                parse_value("EMAIL_VERIFICATION_TIMEOUT", &timeout)?;
        }
        if let Some(host) = lookup("EMAIL_HOST") {
            self.mail.host = host;
        }
        if let Some(port) = lookup("EMAIL_PORT") {
            self.mail.port = parse_value("EMAIL_PORT", &port)?;
        }
        if let Some(user) = lookup("EMAIL_HOST_USER") {
            self.mail.username = user;
        }
        if let Some(password) = lookup("EMAIL_HOST_PASSWORD") {
            self.mail.password = password;
        }
        if let Some(flag) = lookup("EMAIL_USE_TLS") {
            self.mail.starttls = parse_flag(&flag);
        }
        if let Some(from) = lookup("DEFAULT_FROM_EMAIL") {
            self.mail.from_address = from;
        }
        if let Some(flag) = lookup("EMAIL_DELIVERY_CHECK") {
            self.mail.delivery_enabled = parse_flag(&flag);
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Message(format!("{} has an invalid value: {}", key, raw)))
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
