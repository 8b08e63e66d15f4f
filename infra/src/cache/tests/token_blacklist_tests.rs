use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use sefr_core::services::{Clock, ManualClock, TokenBlacklist};
use sefr_shared::config::CacheConfig;

use crate::cache::token_blacklist::remaining_ttl;
use crate::cache::{RedisClient, RedisTokenBlacklist};

#[test]
fn test_remaining_ttl_rounds_up() {
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();

    assert_eq!(remaining_ttl(now + Duration::days(7), now), Some(604_800));
    assert_eq!(remaining_ttl(now + Duration::milliseconds(1500), now), Some(2));
    assert_eq!(remaining_ttl(now + Duration::milliseconds(1), now), Some(1));
    assert_eq!(remaining_ttl(now, now), None);
    assert_eq!(remaining_ttl(now - Duration::seconds(5), now), None);
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_revoke_and_lookup() {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let client = RedisClient::new(CacheConfig::new(url)).await.unwrap();
    let clock = Arc::new(ManualClock::starting_now());
    let blacklist = RedisTokenBlacklist::new(client, clock.clone());

    let jti = uuid::Uuid::new_v4().to_string();
    assert!(!blacklist.is_revoked(&jti).await.unwrap());

    blacklist.revoke(&jti, clock.now() + Duration::minutes(5)).await.unwrap();
    assert!(blacklist.is_revoked(&jti).await.unwrap());

    let expired = uuid::Uuid::new_v4().to_string();
    blacklist.revoke(&expired, clock.now() - Duration::minutes(5)).await.unwrap();
    assert!(!blacklist.is_revoked(&expired).await.unwrap());
}
