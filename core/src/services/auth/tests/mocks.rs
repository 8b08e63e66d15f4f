//! Mock implementations for testing authentication service

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sefr_shared::config::{JwtConfig, VerificationConfig};

use crate::errors::{DomainError, DomainResult};
use crate::repositories::InMemoryUserRepository;
use crate::services::auth::{AuthService, AuthServiceConfig};
use crate::services::clock::ManualClock;
use crate::services::mail::{MailMessage, MailTransport};
use crate::services::token::{InMemoryTokenBlacklist, TokenService};
use crate::services::verification::{ScriptedDigitSource, VerificationManager};

/// Mail transport that records messages and can be told to fail
#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    pub should_fail: AtomicBool,
}

impl MockMailer {
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.should_fail.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockMailer {
    async fn send(&self, message: &MailMessage) -> DomainResult<()> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Transport {
                message: String::from("smtp relay unreachable"),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 9, 30, 0).unwrap()
}

pub struct Harness {
    pub service: AuthService,
    pub users: Arc<InMemoryUserRepository>,
    pub clock: Arc<ManualClock>,
    pub mailer: Arc<MockMailer>,
}

pub fn harness(mailer: MockMailer, delivery: bool, digits: &str) -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let mailer = Arc::new(mailer);

    let verification = Arc::new(VerificationManager::new(
        users.clone(),
        clock.clone(),
        Arc::new(ScriptedDigitSource::new(digits)),
        VerificationConfig::default(),
    ));
    let tokens = Arc::new(TokenService::new(
        JwtConfig::new("auth-test-secret"),
        Arc::new(InMemoryTokenBlacklist::new(clock.clone())),
        clock.clone(),
    ));
    let config = AuthServiceConfig {
        bcrypt_cost: 4,
        min_password_length: 8,
        mail_delivery_enabled: delivery,
    };

    let service = AuthService::new(
        users.clone(),
        verification,
        tokens,
        mailer.clone(),
        clock.clone(),
        config,
    );

    Harness {
        service,
        users,
        clock,
        mailer,
    }
}
