//! Revoked token registry

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::DomainResult;
use crate::services::clock::Clock;

/// Storage for revoked JWT IDs.
///
/// Entries only need to outlive the token they revoke; implementations may
/// drop them once `expires_at` has passed.
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Revoke the token with the given JWT ID until `expires_at`
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> DomainResult<()>;

    /// Whether the JWT ID has been revoked and the entry is still live
    async fn is_revoked(&self, jti: &str) -> DomainResult<bool>;
}

/// Process-local blacklist used by tests and the in-memory backend
pub struct InMemoryTokenBlacklist {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTokenBlacklist {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl TokenBlacklist for InMemoryTokenBlacklist {
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> DomainResult<()> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, until| *until > now);
        if expires_at > now {
            entries.insert(jti.to_string(), expires_at);
        }
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> DomainResult<bool> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(entries.get(jti).map(|until| *until > now).unwrap_or(false))
    }
}
