//! Main token service implementation

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sefr_shared::config::JwtConfig;

use crate::domain::entities::token::{Claims, ClaimsTemplate, TokenPair, TokenType};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::services::clock::Clock;

use super::blacklist::TokenBlacklist;

/// Service for issuing and checking HS256 access and refresh tokens
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    blacklist: Arc<dyn TokenBlacklist>,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// Expiry and not-before are checked against the injected clock rather
    /// than by `jsonwebtoken`, so the library validation only covers the
    /// signature, issuer and audience.
    pub fn new(config: JwtConfig, blacklist: Arc<dyn TokenBlacklist>, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
            blacklist,
            clock,
        }
    }

    pub fn access_lifetime(&self) -> Duration {
        Duration::seconds(self.config.access_token_expiry)
    }

    pub fn refresh_lifetime(&self) -> Duration {
        Duration::seconds(self.config.refresh_token_expiry)
    }

    /// Generates a new token pair (access + refresh tokens) for a user
    pub fn generate_tokens(&self, user: &User) -> DomainResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user)?,
            refresh_token: self.issue(user, TokenType::Refresh)?,
            access_expires_in: self.config.access_token_expiry,
            refresh_expires_in: self.config.refresh_token_expiry,
        })
    }

    pub fn generate_access_token(&self, user: &User) -> DomainResult<String> {
        self.issue(user, TokenType::Access)
    }

    fn issue(&self, user: &User, token_type: TokenType) -> DomainResult<String> {
        let lifetime = match token_type {
            TokenType::Access => self.access_lifetime(),
            TokenType::Refresh => self.refresh_lifetime(),
        };
        let template = ClaimsTemplate {
            issuer: &self.config.issuer,
            audience: &self.config.audience,
            lifetime,
        };
        let claims = Claims::new(
            user.id,
            &user.email,
            user.is_email_verified(),
            token_type,
            &template,
            self.clock.now(),
        );
        self.encode_jwt(&claims)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Decode a token of the expected type and check its time window.
    /// Does not consult the blacklist.
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => TokenError::InvalidClaims,
                _ => TokenError::InvalidTokenFormat,
            })?
            .claims;

        if claims.token_type != expected {
            return Err(TokenError::InvalidClaims);
        }

        let now = self.clock.now();
        if claims.nbf > now.timestamp() {
            return Err(TokenError::TokenNotYetValid);
        }
        if claims.is_expired_at(now) {
            return Err(TokenError::TokenExpired);
        }
        Ok(claims)
    }

    /// Verifies an access token and returns the claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError)` - Token is invalid, expired, revoked or malformed
    pub async fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        let claims = self.decode(token, TokenType::Access)?;
        self.ensure_not_revoked(&claims).await?;
        Ok(claims)
    }

    /// Verifies a refresh token and returns the claims
    ///
    /// Anything other than a live, unrevoked refresh token is reported as
    /// `InvalidRefreshToken`, except expiry which keeps its own error.
    pub async fn verify_refresh_token(&self, token: &str) -> DomainResult<Claims> {
        let claims = self
            .decode(token, TokenType::Refresh)
            .map_err(|e| match e {
                TokenError::TokenExpired => TokenError::TokenExpired,
                _ => TokenError::InvalidRefreshToken,
            })?;
        self.ensure_not_revoked(&claims)
            .await
            .map_err(|e| match e {
                DomainError::Token(TokenError::TokenRevoked) => {
                    DomainError::Token(TokenError::InvalidRefreshToken)
                }
                other => other,
            })?;
        Ok(claims)
    }

    /// Blacklist a token until it would have expired anyway
    pub async fn revoke(&self, claims: &Claims) -> DomainResult<()> {
        self.blacklist.revoke(&claims.jti, claims.expires_at()).await?;
        tracing::info!(
            user_id = %claims.sub,
            jti = %claims.jti,
            event = "token_revoked",
            "Token revoked"
        );
        Ok(())
    }

    async fn ensure_not_revoked(&self, claims: &Claims) -> DomainResult<()> {
        // An unreachable blacklist does not lock every user out
        let revoked = match self.blacklist.is_revoked(&claims.jti).await {
            Ok(revoked) => revoked,
            Err(e) => {
                tracing::warn!(error = %e, jti = %claims.jti, "Blacklist lookup failed");
                false
            }
        };
        if revoked {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }
        Ok(())
    }
}
