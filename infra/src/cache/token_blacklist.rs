//! Redis-backed refresh-token blacklist

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sefr_core::errors::DomainResult;
use sefr_core::services::{Clock, TokenBlacklist};

use super::redis_client::RedisClient;

/// Revoked JWT IDs stored as `<prefix>:blacklist:<jti>` with a TTL equal to
/// the token's remaining lifetime
pub struct RedisTokenBlacklist {
    client: RedisClient,
    clock: Arc<dyn Clock>,
}

impl RedisTokenBlacklist {
    pub fn new(client: RedisClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    pub(crate) fn key(&self, jti: &str) -> String {
        self.client.make_key(&format!("blacklist:{}", jti))
    }
}

/// Whole seconds until `expires_at`, rounded up; `None` once it has passed
pub(crate) fn remaining_ttl(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<u64> {
    let millis = (expires_at - now).num_milliseconds();
    (millis > 0).then(|| (millis as u64).div_ceil(1000))
}

#[async_trait]
impl TokenBlacklist for RedisTokenBlacklist {
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> DomainResult<()> {
        let Some(ttl) = remaining_ttl(expires_at, self.clock.now()) else {
            tracing::debug!(jti, "Token already expired; not blacklisted");
            return Ok(());
        };

        self.client.set_with_expiry(&self.key(jti), "1", ttl).await?;
        tracing::info!(jti, ttl_seconds = ttl, event = "token_revoked", "Refresh token blacklisted");
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> DomainResult<bool> {
        Ok(self.client.exists(&self.key(jti)).await?)
    }
}
