//! # Infrastructure Layer
//!
//! Concrete implementations of the ports declared in `sefr_core`:
//! - **Database**: MySQL repositories and the connection pool using SQLx
//! - **Cache**: Redis client and the refresh-token blacklist
//! - **Mail**: SMTP delivery through lettre, and a logging transport
//!
//! [`InfrastructureServices::initialize`] picks the implementations named by
//! the configuration and hands them to the API as trait objects.

use std::sync::Arc;

use sefr_core::errors::DomainError;
use sefr_core::repositories::{
    ArticleRepository, CategoryRepository, CommentRepository, InMemoryArticleRepository,
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryMediaRepository,
    InMemoryPermissionRepository, InMemoryRolePermissionRepository, InMemoryRoleRepository,
    InMemoryUserRepository, InMemoryUserRoleRepository, MediaRepository, MemoryStore,
    PermissionRepository, RolePermissionRepository, RoleRepository, UserRepository,
    UserRoleRepository,
};
use sefr_core::services::{Clock, HealthProbe, InMemoryTokenBlacklist, MailTransport, TokenBlacklist};
use sefr_shared::config::{AppConfig, StorageBackend};

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Cache module - Redis client and token blacklist
pub mod cache;

/// Mail module - outbound verification mail
pub mod mail;

pub use cache::{RedisClient, RedisTokenBlacklist};
pub use database::{
    DatabasePool, MySqlArticleRepository, MySqlCategoryRepository, MySqlCommentRepository,
    MySqlMediaRepository, MySqlPermissionRepository, MySqlRolePermissionRepository,
    MySqlRoleRepository, MySqlUserRepository, MySqlUserRoleRepository, PoolStatistics,
};
pub use mail::{LogMailTransport, SmtpMailTransport};

/// Repositories over one storage backend
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub permissions: Arc<dyn PermissionRepository>,
    pub role_permissions: Arc<dyn RolePermissionRepository>,
    pub user_roles: Arc<dyn UserRoleRepository>,
}

impl Repositories {
    /// Repositories sharing a single in-memory store
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::with_store(store.clone())),
            categories: Arc::new(InMemoryCategoryRepository::with_store(store.clone())),
            articles: Arc::new(InMemoryArticleRepository::with_store(store.clone())),
            comments: Arc::new(InMemoryCommentRepository::with_store(store.clone())),
            media: Arc::new(InMemoryMediaRepository::with_store(store.clone())),
            roles: Arc::new(InMemoryRoleRepository::with_store(store.clone())),
            permissions: Arc::new(InMemoryPermissionRepository::with_store(store.clone())),
            role_permissions: Arc::new(InMemoryRolePermissionRepository::with_store(store.clone())),
            user_roles: Arc::new(InMemoryUserRoleRepository::with_store(store)),
        }
    }

    /// MySQL repositories over one pool
    pub fn mysql(pool: &DatabasePool) -> Self {
        let pool = pool.get_pool().clone();
        Self {
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            categories: Arc::new(MySqlCategoryRepository::new(pool.clone())),
            articles: Arc::new(MySqlArticleRepository::new(pool.clone())),
            comments: Arc::new(MySqlCommentRepository::new(pool.clone())),
            media: Arc::new(MySqlMediaRepository::new(pool.clone())),
            roles: Arc::new(MySqlRoleRepository::new(pool.clone())),
            permissions: Arc::new(MySqlPermissionRepository::new(pool.clone())),
            role_permissions: Arc::new(MySqlRolePermissionRepository::new(pool.clone())),
            user_roles: Arc::new(MySqlUserRoleRepository::new(pool)),
        }
    }
}

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    pub repositories: Repositories,
    pub blacklist: Arc<dyn TokenBlacklist>,
    pub mailer: Arc<dyn MailTransport>,
    pub health: Arc<dyn HealthProbe>,
    /// Set only for the MySQL backend, so the pool can be closed on shutdown
    pub pool: Option<DatabasePool>,
}

impl InfrastructureServices {
    /// In-memory everything: shared store, process-local blacklist, logging mailer
    pub fn in_memory(store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repositories: Repositories::in_memory(store.clone()),
            blacklist: Arc::new(InMemoryTokenBlacklist::new(clock)),
            mailer: Arc::new(LogMailTransport::new()),
            health: store,
            pool: None,
        }
    }

    /// Build the services selected by `config`.
    ///
    /// This function sets up:
    /// - the MySQL pool and migrations, or a fresh in-memory store
    /// - the Redis blacklist when the cache is enabled
    /// - SMTP delivery when mail delivery is enabled
    pub async fn initialize(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, InfrastructureError> {
        tracing::info!(
            backend = ?config.database.backend,
            cache_enabled = config.cache.enabled,
            mail_delivery = config.mail.delivery_enabled,
            "Initializing infrastructure services"
        );

        let mut services = match config.database.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using the in-memory store; data is lost on restart");
                Self::in_memory(Arc::new(MemoryStore::new()), clock.clone())
            }
            StorageBackend::MySql => {
                let pool = DatabasePool::new(config.database.clone()).await?;
                if config.database.run_migrations {
                    pool.run_migrations().await?;
                }
                Self {
                    repositories: Repositories::mysql(&pool),
                    blacklist: Arc::new(InMemoryTokenBlacklist::new(clock.clone())),
                    mailer: Arc::new(LogMailTransport::new()),
                    health: Arc::new(pool.clone()),
                    pool: Some(pool),
                }
            }
        };

        if config.cache.enabled {
            let client = RedisClient::new(config.cache.clone()).await?;
            services.blacklist = Arc::new(RedisTokenBlacklist::new(client, clock));
        }

        if config.mail.delivery_enabled {
            services.mailer = Arc::new(SmtpMailTransport::new(&config.mail)?);
        }

        tracing::info!("Infrastructure services initialized successfully");
        Ok(services)
    }

    /// Close pooled connections
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Mail composition or delivery error
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Mail(message) => DomainError::Transport { message },
            other => DomainError::store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sefr_core::services::SystemClock;

    #[test]
    fn test_error_mapping() {
        let mail: DomainError = InfrastructureError::Mail("relay refused".into()).into();
        assert!(matches!(mail, DomainError::Transport { ref message } if message == "relay refused"));

        let config: DomainError = InfrastructureError::Config("bad url".into()).into();
        assert!(matches!(config, DomainError::Store { .. }));
        assert!(config.is_server_error());
    }

    #[tokio::test]
    async fn test_initialize_in_memory() {
        let config = AppConfig::testing();
        let services = InfrastructureServices::initialize(&config, Arc::new(SystemClock))
            .await
            .unwrap();

        assert!(services.pool.is_none());
        assert!(services.health.ping().await.is_ok());
        assert!(services.repositories.users.list(Default::default()).await.unwrap().results.is_empty());
    }
}
