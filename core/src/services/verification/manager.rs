//! Verification code lifecycle: issue, check, consume.

use std::sync::Arc;

use chrono::Duration;
use sefr_shared::config::verification::MAX_CODE_TIMEOUT_SECONDS;
use sefr_shared::config::VerificationConfig;
use sefr_shared::utils::mask_email;

use crate::domain::entities::{ConsumeOutcome, User};
use crate::errors::{AuthError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::clock::Clock;

use super::digits::{generate_code, DigitSource};

/// Owns the email verification state transitions of user records.
///
/// Every mutating call works on a copy of the user, persists it, and only
/// then writes the stored record back into the caller's `User`. A store
/// failure therefore propagates unchanged and leaves the caller's value as
/// it was. The manager never sends mail; callers dispatch the returned code.
pub struct VerificationManager {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    digits: Arc<dyn DigitSource>,
    config: VerificationConfig,
}

impl VerificationManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
        digits: Arc<dyn DigitSource>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            users,
            clock,
            digits,
            config,
        }
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Validity window of an issued code, clamped to the supported range
    pub fn timeout(&self) -> Duration {
        Duration::seconds(self.config.code_timeout_seconds.clamp(0, MAX_CODE_TIMEOUT_SECONDS))
    }

    /// Issue a fresh code of `length` digits (the configured length when
    /// `None`), replacing any unconsumed one, and persist the user.
    ///
    /// # Errors
    /// * `AuthError::EmailAlreadyVerified` - verified accounts never get a new code
    /// * whatever the store returns from `update`
    pub async fn issue(&self, user: &mut User, length: Option<usize>) -> DomainResult<String> {
        let length = length.unwrap_or(self.config.code_length);
        let now = self.clock.now();
        let code = generate_code(self.digits.as_ref(), length);

        let mut updated = user.clone();
        updated.verification.issue(code.clone(), now)?;
        updated.touch(now);
        *user = self.users.update(updated).await?;

        tracing::info!(
            user_id = %user.id,
            email = %mask_email(&user.email),
            code_length = length,
            event = "verification_code_issued",
            "Verification code issued"
        );
        Ok(code)
    }

    /// Whether `candidate` would currently be accepted for `user`
    pub fn is_valid(&self, user: &User, candidate: &str) -> bool {
        user.verification
            .is_valid(candidate, self.clock.now(), self.timeout())
    }

    /// Submit a candidate code. Only a `Verified` outcome writes to the store.
    pub async fn consume(&self, user: &mut User, candidate: &str) -> DomainResult<ConsumeOutcome> {
        let now = self.clock.now();
        let mut updated = user.clone();
        let outcome = updated.verification.consume(candidate, now, self.timeout());

        match outcome {
            ConsumeOutcome::Verified => {
                updated.touch(now);
                *user = self.users.update(updated).await?;
                tracing::info!(
                    user_id = %user.id,
                    email = %mask_email(&user.email),
                    event = "email_verified",
                    "Email address verified"
                );
            }
            ConsumeOutcome::InvalidOrExpired => {
                tracing::warn!(
                    user_id = %user.id,
                    email = %mask_email(&user.email),
                    event = "verification_code_rejected",
                    "Invalid or expired verification code"
                );
            }
            ConsumeOutcome::AlreadyVerified => {
                tracing::debug!(
                    user_id = %user.id,
                    event = "verification_already_done",
                    "Verification requested for an already verified user"
                );
            }
        }

        Ok(outcome)
    }

    /// Verify `user` without a code. Returns false, writing nothing, when the
    /// user was already verified.
    pub async fn verify_directly(&self, user: &mut User) -> DomainResult<bool> {
        let now = self.clock.now();
        let mut updated = user.clone();
        if !updated.verification.force_verify() {
            return Ok(false);
        }
        updated.touch(now);
        *user = self.users.update(updated).await?;

        tracing::warn!(
            user_id = %user.id,
            email = %mask_email(&user.email),
            event = "email_verified_directly",
            "Email address verified without a code"
        );
        Ok(true)
    }

    pub fn is_verified(&self, user: &User) -> bool {
        user.verification.is_verified()
    }

    /// Load a user by (lowercased) email
    ///
    /// # Errors
    /// * `AuthError::UserNotFound` - no account with this email
    pub async fn find_user(&self, email: &str) -> DomainResult<User> {
        self.users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// [`issue`](Self::issue) for the account registered under `email`
    pub async fn issue_for_email(
        &self,
        email: &str,
        length: Option<usize>,
    ) -> DomainResult<(User, String)> {
        let mut user = self.find_user(email).await?;
        let code = self.issue(&mut user, length).await?;
        Ok((user, code))
    }

    /// [`consume`](Self::consume) for the account registered under `email`
    pub async fn consume_for_email(
        &self,
        email: &str,
        candidate: &str,
    ) -> DomainResult<(User, ConsumeOutcome)> {
        let mut user = self.find_user(email).await?;
        let outcome = self.consume(&mut user, candidate).await?;
        Ok((user, outcome))
    }
}
