//! Main authentication service implementation

use std::sync::Arc;

use sefr_shared::utils::mask_email;
use sefr_shared::validation::{check_password, is_valid_email, is_valid_username, not_blank, PasswordIssue};
use uuid::Uuid;

use crate::domain::entities::{ConsumeOutcome, User};
use crate::domain::value_objects::{
    AuthSession, DebugCode, EmailStatus, RegistrationOutcome, ResendOutcome, VerifyEmailOutcome,
};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::UserRepository;
use crate::services::clock::Clock;
use crate::services::mail::{MailTransport, VerificationEmail};
use crate::services::token::TokenService;
use crate::services::verification::VerificationManager;

use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};

/// Input of [`AuthService::register`]
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to the local part of the email
    pub username: Option<String>,
}

/// Authentication service for managing the complete account flow
pub struct AuthService {
    /// User repository for database operations
    users: Arc<dyn UserRepository>,
    /// Verification code lifecycle
    verification: Arc<VerificationManager>,
    /// Token service for JWT management
    tokens: Arc<TokenService>,
    /// Outbound mail
    mailer: Arc<dyn MailTransport>,
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        verification: Arc<VerificationManager>,
        tokens: Arc<TokenService>,
        mailer: Arc<dyn MailTransport>,
        clock: Arc<dyn Clock>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            verification,
            tokens,
            mailer,
            clock,
            config,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Register a new account and send it a verification code
    ///
    /// This method:
    /// 1. Validates email, password and names
    /// 2. Rejects taken emails and explicitly requested usernames
    /// 3. Creates the user with a bcrypt hash and issues a code
    /// 4. Sends the verification email when delivery is enabled
    ///
    /// A failed send does not fail the registration; it is reported in
    /// [`RegistrationOutcome::email_status`].
    pub async fn register(&self, input: Registration) -> DomainResult<RegistrationOutcome> {
        let email = normalize_email(&input.email);
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        self.validate_password(&input.password)?;
        if !not_blank(&input.first_name) {
            return Err(ValidationError::required("first_name").into());
        }
        if !not_blank(&input.last_name) {
            return Err(ValidationError::required("last_name").into());
        }

        if self.users.exists_by_email(&email).await? {
            return Err(AuthError::UserAlreadyExists {
                field: String::from("email"),
            }
            .into());
        }

        let username = match input.username.as_deref().map(str::trim) {
            Some(requested) if !requested.is_empty() => {
                if !is_valid_username(requested) {
                    return Err(ValidationError::InvalidFormat {
                        field: String::from("username"),
                    }
                    .into());
                }
                if self.users.exists_by_username(requested).await? {
                    return Err(AuthError::UserAlreadyExists {
                        field: String::from("username"),
                    }
                    .into());
                }
                requested.to_string()
            }
            _ => self.default_username(&email).await?,
        };

        let password_hash = hash_password(&input.password, self.config.bcrypt_cost).await?;
        let user = User::new(
            username,
            email,
            input.first_name.trim(),
            input.last_name.trim(),
            password_hash,
            self.clock.now(),
        );
        let mut user = self.users.create(user).await?;

        tracing::info!(
            user_id = %user.id,
            email = %mask_email(&user.email),
            event = "user_registered",
            "User registered"
        );

        let code = self.verification.issue(&mut user, None).await?;
        let email_status = self.dispatch_registration_mail(&user, &code).await;
        let tokens = self.tokens.generate_tokens(&user)?;

        Ok(RegistrationOutcome {
            session: AuthSession { user, tokens },
            email_status,
            expires_in_hours: self.verification.config().expires_in_hours(),
        })
    }

    /// Authenticate by email (when `login` contains `@`) or username
    pub async fn login(&self, login: &str, password: &str) -> DomainResult<AuthSession> {
        let login = login.trim();
        let found = if login.contains('@') {
            self.users.find_by_email(&normalize_email(login)).await?
        } else {
            self.users.find_by_username(login).await?
        };

        let mut user = match found {
            Some(user) => user,
            None => {
                tracing::warn!(event = "login_failed", reason = "unknown_user", "Login failed");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::warn!(
                user_id = %user.id,
                event = "login_failed",
                reason = "bad_password",
                "Login failed"
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        user.record_login(self.clock.now());
        let user = self.users.update(user).await?;
        let tokens = self.tokens.generate_tokens(&user)?;

        tracing::info!(user_id = %user.id, event = "login_succeeded", "User logged in");
        Ok(AuthSession { user, tokens })
    }

    /// Submit a verification code for the account registered under `email`
    ///
    /// # Errors
    /// * `AuthError::UserNotFound` - unknown email
    /// * `AuthError::InvalidOrExpiredCode` - wrong or stale code
    pub async fn verify_email(&self, email: &str, code: &str) -> DomainResult<VerifyEmailOutcome> {
        let (user, outcome) = self.verification.consume_for_email(email, code).await?;

        match outcome {
            ConsumeOutcome::Verified => {
                let tokens = self.tokens.generate_tokens(&user)?;
                Ok(VerifyEmailOutcome::Verified(AuthSession { user, tokens }))
            }
            ConsumeOutcome::AlreadyVerified => Ok(VerifyEmailOutcome::AlreadyVerified(user)),
            ConsumeOutcome::InvalidOrExpired => Err(AuthError::InvalidOrExpiredCode.into()),
        }
    }

    /// Issue and send a fresh code. Unlike registration, a failed send is an error.
    pub async fn resend_verification(&self, email: &str) -> DomainResult<ResendOutcome> {
        let mut user = self.verification.find_user(email).await?;
        if self.verification.is_verified(&user) {
            return Ok(ResendOutcome::AlreadyVerified);
        }

        let code = self.verification.issue(&mut user, None).await?;
        if self.config.mail_delivery_enabled {
            self.mailer.send(&self.verification_mail(&user, &code)).await?;
            tracing::info!(
                user_id = %user.id,
                email = %mask_email(&user.email),
                event = "verification_email_sent",
                "Verification email re-sent"
            );
        } else {
            tracing::debug!(
                user_id = %user.id,
                event = "verification_email_skipped",
                "Mail delivery disabled; code not sent"
            );
        }

        Ok(ResendOutcome::Sent {
            email: user.email,
            expires_in_hours: self.verification.config().expires_in_hours(),
        })
    }

    /// Blacklist the caller's refresh token
    ///
    /// # Errors
    /// * `TokenError::InvalidRefreshToken` - malformed, expired, revoked, or
    ///   issued to another user
    pub async fn logout(&self, refresh_token: &str, caller: Uuid) -> DomainResult<()> {
        let claims = self
            .tokens
            .verify_refresh_token(refresh_token)
            .await
            .map_err(|e| match e {
                DomainError::Token(_) => DomainError::Token(TokenError::InvalidRefreshToken),
                other => other,
            })?;

        if claims.user_id()? != caller {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        self.tokens.revoke(&claims).await
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<String> {
        let claims = self.tokens.verify_refresh_token(refresh_token).await?;
        let user_id = claims
            .user_id()
            .map_err(|_| TokenError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;
        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        self.tokens.generate_access_token(&user)
    }

    /// Development helper: mark an account verified without a code and sign
    /// it in
    ///
    /// # Errors
    /// * `AuthError::UserNotFound` - unknown email
    pub async fn direct_verify(&self, email: &str) -> DomainResult<VerifyEmailOutcome> {
        let mut user = self.verification.find_user(email).await?;
        if !self.verification.verify_directly(&mut user).await? {
            return Ok(VerifyEmailOutcome::AlreadyVerified(user));
        }
        let tokens = self.tokens.generate_tokens(&user)?;
        Ok(VerifyEmailOutcome::Verified(AuthSession { user, tokens }))
    }

    /// Development helper: the pending code of an account, issuing one if
    /// none is pending
    pub async fn peek_verification_code(&self, email: &str) -> DomainResult<DebugCode> {
        let mut user = self.verification.find_user(email).await?;
        if self.verification.is_verified(&user) {
            return Ok(DebugCode::AlreadyVerified);
        }

        if user.verification.pending().is_none() {
            self.verification.issue(&mut user, None).await?;
        }

        let timeout = self.verification.timeout();
        match user.verification.pending() {
            Some(pending) => Ok(DebugCode::Pending {
                email: user.email.clone(),
                code: pending.code.clone(),
                expires_at: pending.issued_at + timeout,
            }),
            None => Err(DomainError::Internal {
                message: String::from("Issued code was not retained"),
            }),
        }
    }

    fn validate_password(&self, password: &str) -> DomainResult<()> {
        let min = self.config.min_password_length;
        check_password(password, min).map_err(|issue| match issue {
            PasswordIssue::TooShort => ValidationError::PasswordTooShort { min },
            PasswordIssue::EntirelyNumeric => ValidationError::PasswordEntirelyNumeric,
        })?;
        Ok(())
    }

    /// Local part of the email, suffixed with 1, 2, ... until free
    async fn default_username(&self, email: &str) -> DomainResult<String> {
        let local = email.split('@').next().unwrap_or_default();
        let mut base: String = local
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '+' | '-' | '_'))
            .take(140)
            .collect();
        if base.is_empty() {
            base = String::from("user");
        }

        if !self.users.exists_by_username(&base).await? {
            return Ok(base);
        }
        let mut counter: u32 = 1;
        loop {
            let candidate = format!("{}{}", base, counter);
            if !self.users.exists_by_username(&candidate).await? {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    async fn dispatch_registration_mail(&self, user: &User, code: &str) -> EmailStatus {
        if !self.config.mail_delivery_enabled {
            tracing::debug!(
                user_id = %user.id,
                event = "verification_email_skipped",
                "Mail delivery disabled; code not sent"
            );
            return EmailStatus::Skipped;
        }

        match self.mailer.send(&self.verification_mail(user, code)).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %user.id,
                    email = %mask_email(&user.email),
                    event = "verification_email_sent",
                    "Verification email sent"
                );
                EmailStatus::Sent
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    email = %mask_email(&user.email),
                    error = %e,
                    event = "verification_email_failed",
                    "Verification email could not be sent"
                );
                EmailStatus::Failed(e.to_string())
            }
        }
    }

    fn verification_mail(&self, user: &User, code: &str) -> crate::services::mail::MailMessage {
        let issued_at = user.verification.issued_at().unwrap_or_else(|| self.clock.now());
        VerificationEmail {
            to: &user.email,
            username: &user.username,
            code,
            expires_at: issued_at + self.verification.timeout(),
        }
        .render()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
