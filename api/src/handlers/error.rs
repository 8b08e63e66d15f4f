//! Mapping of domain errors to HTTP responses.
//!
//! Every failure leaving a handler goes through [`ApiError`], which picks the
//! status code, the error kind and the localized message for the caller's
//! `Accept-Language`.

use std::collections::BTreeMap;
use std::fmt;
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::{HeaderMap, ACCEPT_LANGUAGE};
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use sefr_core::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use sefr_shared::{error_codes, ErrorResponse};

use crate::i18n::{localize, Language};

/// Preferred language of the request, from `Accept-Language`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lang(pub Language);

pub fn language_from_headers(headers: &HeaderMap) -> Language {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

impl FromRequest for Lang {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Lang(language_from_headers(req.headers()))))
    }
}

#[derive(Debug)]
enum Failure {
    Domain(DomainError),
    /// Body, query or path that did not parse or failed field validation
    InvalidRequest {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },
    MissingToken,
    DebugOnly,
}

/// Error returned by handlers and middleware
#[derive(Debug)]
pub struct ApiError {
    failure: Failure,
    lang: Language,
}

impl ApiError {
    pub fn domain(error: DomainError, lang: Language) -> Self {
        Self {
            failure: Failure::Domain(error),
            lang,
        }
    }

    /// A request that could not be deserialized
    pub fn malformed(message: impl Into<String>, lang: Language) -> Self {
        Self {
            failure: Failure::InvalidRequest {
                message: message.into(),
                fields: BTreeMap::new(),
            },
            lang,
        }
    }

    /// Field errors reported by `validator`
    pub fn invalid(errors: validator::ValidationErrors, lang: Language) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self {
            failure: Failure::InvalidRequest {
                message: errors.to_string(),
                fields,
            },
            lang,
        }
    }

    pub fn missing_token(lang: Language) -> Self {
        Self {
            failure: Failure::MissingToken,
            lang,
        }
    }

    pub fn debug_only(lang: Language) -> Self {
        Self {
            failure: Failure::DebugOnly,
            lang,
        }
    }

    pub fn domain_error(&self) -> Option<&DomainError> {
        match &self.failure {
            Failure::Domain(error) => Some(error),
            _ => None,
        }
    }

    fn describe(&self) -> Descriptor {
        match &self.failure {
            Failure::Domain(error) => describe_domain(error),
            Failure::InvalidRequest { .. } => Descriptor::new(
                StatusCode::BAD_REQUEST,
                error_codes::VALIDATION_ERROR,
                "validation",
                "invalid_request",
            ),
            Failure::MissingToken => Descriptor::new(
                StatusCode::UNAUTHORIZED,
                error_codes::UNAUTHORIZED,
                "token",
                "missing_token",
            ),
            Failure::DebugOnly => Descriptor::new(
                StatusCode::FORBIDDEN,
                error_codes::FORBIDDEN,
                "general",
                "debug_only",
            ),
        }
    }

    /// Body sent to the client
    pub fn to_error_response(&self) -> ErrorResponse {
        let descriptor = self.describe();
        let message = localize(descriptor.category, descriptor.key, self.lang, &descriptor.params);

        let mut response = ErrorResponse::new(descriptor.kind, message).with_code(descriptor.key);
        if let Some(field) = descriptor.field {
            response = response.add_detail("field", field);
        }
        if let Failure::InvalidRequest { message, fields } = &self.failure {
            if fields.is_empty() {
                response = response.add_detail("reason", message);
            } else {
                response = response.add_detail("fields", fields);
            }
        }
        response
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            Failure::Domain(error) => write!(f, "{}", error),
            Failure::InvalidRequest { message, .. } => write!(f, "Invalid request: {}", message),
            Failure::MissingToken => write!(f, "Missing bearer token"),
            Failure::DebugOnly => write!(f, "Debug endpoint disabled"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.describe().status
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), event = "request_failed", "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        HttpResponse::build(status).json(self.to_error_response())
    }
}

/// Attach the request language to a domain result
pub trait Localize<T> {
    fn localized(self, lang: Language) -> Result<T, ApiError>;
}

impl<T> Localize<T> for DomainResult<T> {
    fn localized(self, lang: Language) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::domain(e, lang))
    }
}

struct Descriptor {
    status: StatusCode,
    kind: &'static str,
    category: &'static str,
    key: &'static str,
    params: Vec<(&'static str, String)>,
    field: Option<String>,
}

impl Descriptor {
    fn new(status: StatusCode, kind: &'static str, category: &'static str, key: &'static str) -> Self {
        Self {
            status,
            kind,
            category,
            key,
            params: Vec::new(),
            field: None,
        }
    }

    fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    fn field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.params.push(("field", field.clone()));
        self.field = Some(field);
        self
    }
}

fn describe_domain(error: &DomainError) -> Descriptor {
    use error_codes::*;

    match error {
        DomainError::Validation { message } => {
            Descriptor::new(StatusCode::BAD_REQUEST, VALIDATION_ERROR, "validation", "business_rule")
                .param("rule", message)
        }
        DomainError::NotFound { resource } => {
            Descriptor::new(StatusCode::NOT_FOUND, NOT_FOUND, "general", "not_found")
                .param("resource", resource)
        }
        DomainError::Unauthorized => {
            Descriptor::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED, "general", "unauthorized")
        }
        DomainError::Forbidden { .. } => {
            Descriptor::new(StatusCode::FORBIDDEN, FORBIDDEN, "general", "forbidden")
        }
        DomainError::Store { .. } => {
            Descriptor::new(StatusCode::INTERNAL_SERVER_ERROR, DATABASE_ERROR, "general", "internal_error")
        }
        DomainError::Transport { .. } => Descriptor::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            EMAIL_ERROR,
            "general",
            "email_sending_failed",
        ),
        DomainError::Internal { .. } => Descriptor::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            "general",
            "internal_error",
        ),
        DomainError::Auth(error) => describe_auth(error),
        DomainError::Token(error) => describe_token(error),
        DomainError::ValidationErr(error) => describe_validation(error),
    }
}

fn describe_auth(error: &AuthError) -> Descriptor {
    use error_codes::*;

    match error {
        AuthError::UserNotFound => {
            Descriptor::new(StatusCode::NOT_FOUND, NOT_FOUND, "auth", "user_not_found")
        }
        AuthError::UserAlreadyExists { field } => {
            Descriptor::new(StatusCode::CONFLICT, CONFLICT, "auth", "user_already_exists").field(field.as_str())
        }
        AuthError::InvalidCredentials => {
            Descriptor::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED, "auth", "invalid_credentials")
        }
        AuthError::AccountInactive => {
            Descriptor::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED, "auth", "account_inactive")
        }
        AuthError::InvalidOrExpiredCode => Descriptor::new(
            StatusCode::BAD_REQUEST,
            VERIFICATION_CODE_INVALID,
            "auth",
            "invalid_code",
        ),
        AuthError::EmailAlreadyVerified => {
            Descriptor::new(StatusCode::BAD_REQUEST, BAD_REQUEST, "auth", "already_verified")
        }
        AuthError::InsufficientPermissions => {
            Descriptor::new(StatusCode::FORBIDDEN, FORBIDDEN, "auth", "insufficient_permissions")
        }
    }
}

fn describe_token(error: &TokenError) -> Descriptor {
    use error_codes::*;

    match error {
        TokenError::TokenExpired => {
            Descriptor::new(StatusCode::UNAUTHORIZED, TOKEN_EXPIRED, "token", "token_expired")
        }
        TokenError::InvalidTokenFormat
        | TokenError::InvalidSignature
        | TokenError::TokenNotYetValid
        | TokenError::InvalidClaims => {
            Descriptor::new(StatusCode::UNAUTHORIZED, TOKEN_INVALID, "token", "token_invalid")
        }
        TokenError::TokenRevoked => {
            Descriptor::new(StatusCode::UNAUTHORIZED, TOKEN_INVALID, "token", "token_revoked")
        }
        TokenError::InvalidRefreshToken => {
            Descriptor::new(StatusCode::BAD_REQUEST, TOKEN_INVALID, "token", "invalid_refresh_token")
        }
        TokenError::TokenGenerationFailed => Descriptor::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            "token",
            "token_generation_failed",
        ),
    }
}

fn describe_validation(error: &ValidationError) -> Descriptor {
    use error_codes::*;

    let bad = |key| Descriptor::new(StatusCode::BAD_REQUEST, VALIDATION_ERROR, "validation", key);
    match error {
        ValidationError::RequiredField { field } => bad("required_field").field(field.as_str()),
        ValidationError::InvalidFormat { field } => bad("invalid_format").field(field.as_str()),
        ValidationError::InvalidLength { field, min, max, .. } => bad("invalid_length")
            .field(field.as_str())
            .param("min", min)
            .param("max", max),
        ValidationError::TooShort { field, min } => {
            bad("too_short").field(field.as_str()).param("min", min)
        }
        ValidationError::InvalidEmail => bad("invalid_email").field("email"),
        ValidationError::InvalidUrl => bad("invalid_url").field("url"),
        ValidationError::PasswordTooShort { min } => {
            bad("password_too_short").field("password").param("min", min)
        }
        ValidationError::PasswordEntirelyNumeric => bad("password_entirely_numeric").field("password"),
        ValidationError::DuplicateValue { field } => {
            Descriptor::new(StatusCode::CONFLICT, CONFLICT, "validation", "duplicate_value").field(field.as_str())
        }
        ValidationError::BusinessRuleViolation { rule } => bad("business_rule").param("rule", rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (DomainError::not_found("Article"), StatusCode::NOT_FOUND),
            (DomainError::forbidden("no"), StatusCode::FORBIDDEN),
            (AuthError::InvalidOrExpiredCode.into(), StatusCode::BAD_REQUEST),
            (AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (AuthError::UserAlreadyExists { field: String::from("email") }.into(), StatusCode::CONFLICT),
            (TokenError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (TokenError::InvalidRefreshToken.into(), StatusCode::BAD_REQUEST),
            (ValidationError::DuplicateValue { field: String::from("slug") }.into(), StatusCode::CONFLICT),
            (ValidationError::InvalidUrl.into(), StatusCode::BAD_REQUEST),
            (
                DomainError::Transport { message: String::from("smtp down") },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let api = ApiError::domain(error, Language::English);
            assert_eq!(api.status_code(), expected, "{}", api);
        }
    }

    #[test]
    fn test_error_body_carries_code_and_field() {
        let error = ApiError::domain(
            AuthError::UserAlreadyExists { field: String::from("username") }.into(),
            Language::English,
        );
        let body = serde_json::to_value(error.to_error_response()).unwrap();

        assert_eq!(body["error"], error_codes::CONFLICT);
        assert_eq!(body["code"], "user_already_exists");
        assert_eq!(body["details"]["field"], "username");
        assert!(body["message"].as_str().unwrap().contains("username"));
    }

    #[test]
    fn test_messages_are_localized() {
        let english = ApiError::domain(AuthError::InvalidOrExpiredCode.into(), Language::English);
        let persian = ApiError::domain(AuthError::InvalidOrExpiredCode.into(), Language::Persian);

        assert_ne!(
            english.to_error_response().message,
            persian.to_error_response().message
        );
    }

    #[test]
    fn test_transport_failure_uses_email_key() {
        let error = ApiError::domain(
            DomainError::Transport { message: String::from("timeout") },
            Language::English,
        );
        let body = error.to_error_response();
        assert_eq!(body.error, error_codes::EMAIL_ERROR);
        assert_eq!(body.code.as_deref(), Some("email_sending_failed"));
    }

    #[actix_web::test]
    async fn test_missing_token_response() {
        let response = ApiError::missing_token(Language::English).error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "missing_token");
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_language_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(language_from_headers(&headers), Language::English);

        headers.insert(ACCEPT_LANGUAGE, "fa-IR".parse().unwrap());
        assert_eq!(language_from_headers(&headers), Language::Persian);
    }
}
