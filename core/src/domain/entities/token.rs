//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

/// Which of the two tokens a set of claims belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, the key used by the blacklist
    pub jti: String,

    pub token_type: TokenType,

    pub email: String,

    /// Whether the user's email was verified when the token was issued
    pub is_verified: bool,
}

/// Issuer, audience and lifetime shared by every token of one type
#[derive(Debug, Clone)]
pub struct ClaimsTemplate<'a> {
    pub issuer: &'a str,
    pub audience: &'a str,
    pub lifetime: Duration,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        email: &str,
        is_verified: bool,
        token_type: TokenType,
        template: &ClaimsTemplate<'_>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + template.lifetime).timestamp(),
            nbf: now.timestamp(),
            iss: template.issuer.to_string(),
            aud: template.audience.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type,
            email: email.to_string(),
            is_verified,
        }
    }

    /// Parses the subject back into a user ID
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::InvalidClaims)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Access and refresh token issued together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub access_expires_in: i64,
    /// Seconds until the refresh token expires
    pub refresh_expires_in: i64,
}
