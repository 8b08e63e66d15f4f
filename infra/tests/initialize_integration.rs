//! Integration tests for wiring infrastructure from configuration.
//!
//! The memory backend needs no external services; the MySQL path is covered
//! by the ignored repository tests.

use std::sync::Arc;

use chrono::Duration;
use sefr_core::domain::entities::User;
use sefr_core::repositories::UserRepository;
use sefr_core::services::{Clock, HealthProbe, MailMessage, MailTransport, ManualClock, TokenBlacklist};
use sefr_infra::{InfrastructureServices, LogMailTransport};
use sefr_shared::AppConfig;

#[tokio::test]
async fn test_memory_backend_initializes_without_external_services() {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_now());
    let services = InfrastructureServices::initialize(&AppConfig::testing(), clock)
        .await
        .expect("memory backend initializes");

    assert!(services.pool.is_none());
    assert!(services.health.ping().await.is_ok());
    assert_eq!(services.repositories.users.list(Default::default()).await.unwrap().count, 0);

    services.shutdown().await;
}

#[tokio::test]
async fn test_repositories_share_one_store() {
    let clock = Arc::new(ManualClock::starting_now());
    let services = InfrastructureServices::initialize(&AppConfig::testing(), clock.clone())
        .await
        .unwrap();

    let user = User::new(
        "sara".to_string(),
        "sara@example.com".to_string(),
        "Sara".to_string(),
        "Ahmadi".to_string(),
        "hash".to_string(),
        clock.now(),
    );
    let created = services.repositories.users.create(user).await.unwrap();

    let clone = services.clone();
    let found = clone.repositories.users.find_by_email("sara@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(created.id));
}

#[tokio::test]
async fn test_blacklist_forgets_tokens_after_expiry() {
    let clock = Arc::new(ManualClock::starting_now());
    let services = InfrastructureServices::initialize(&AppConfig::testing(), clock.clone())
        .await
        .unwrap();

    services
        .blacklist
        .revoke("jti-1", clock.now() + Duration::minutes(5))
        .await
        .unwrap();
    assert!(services.blacklist.is_revoked("jti-1").await.unwrap());

    clock.advance(Duration::minutes(6));
    assert!(!services.blacklist.is_revoked("jti-1").await.unwrap());
}

#[tokio::test]
async fn test_log_transport_records_messages() {
    let transport = LogMailTransport::new();
    transport
        .send(&MailMessage {
            to: "sara@example.com".to_string(),
            subject: "Verify your email".to_string(),
            text_body: "Your code is 123456".to_string(),
            html_body: "<p>Your code is 123456</p>".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(transport.sent().len(), 1);
    assert!(transport.last_to("sara@example.com").is_some());
    assert!(transport.last_to("reza@example.com").is_none());
}
