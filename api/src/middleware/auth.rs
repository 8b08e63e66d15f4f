//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the bearer token from the Authorization header,
//! verifies it with the [`TokenService`] held in [`AppState`] and injects an
//! [`AuthContext`] into the request. Handlers that act on behalf of the
//! caller take a [`CurrentUser`], which loads the full user record.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use sefr_core::{
    domain::entities::{Claims, User},
    errors::{AuthError, DomainError, TokenError},
};
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use crate::handlers::error::{language_from_headers, ApiError, Localize};
use crate::state::AppState;

/// Authenticated caller, as stated by a verified access token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    /// Whether the email was verified when the token was issued
    pub is_verified: bool,
    pub jti: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let user_id = claims.user_id()?;
        Ok(Self {
            user_id,
            email: claims.email,
            is_verified: claims.is_verified,
            jti: claims.jti,
        })
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(context) => {
                    req.extensions_mut().insert(context);
                    Ok(service.call(req).await?.map_into_left_body())
                }
                Err(error) => Ok(req.error_response(error).map_into_right_body()),
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<AuthContext, ApiError> {
    let lang = language_from_headers(req.headers());
    let token = extract_bearer_token(req).ok_or_else(|| ApiError::missing_token(lang))?;

    let state = req.app_data::<web::Data<AppState>>().cloned().ok_or_else(|| {
        tracing::error!("AppState is not registered; cannot verify tokens");
        ApiError::domain(
            DomainError::Internal {
                message: "token verification not configured".to_string(),
            },
            lang,
        )
    })?;

    let claims = state.tokens.verify_access_token(&token).await.map_err(|e| {
        tracing::debug!(error = %e, path = req.path(), "Access token rejected");
        ApiError::domain(e, lang)
    })?;
    AuthContext::from_claims(claims).localized(lang)
}

/// Extracts the token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::missing_token(language_from_headers(req.headers())).into());

        ready(result)
    }
}

/// The caller's user record, loaded for handlers that check ownership
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let lang = language_from_headers(req.headers());
        let context = req.extensions().get::<AuthContext>().cloned();
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let (Some(context), Some(state)) = (context, state) else {
                return Err(ApiError::missing_token(lang).into());
            };

            // A token can outlive its user; treat that as an invalid token
            match state.users.get(context.user_id).await {
                Ok(user) if user.is_active => Ok(CurrentUser(user)),
                Ok(_) => Err(ApiError::domain(AuthError::AccountInactive.into(), lang).into()),
                Err(DomainError::Auth(AuthError::UserNotFound)) => {
                    Err(ApiError::domain(TokenError::InvalidClaims.into(), lang).into())
                }
                Err(e) => Err(ApiError::domain(e, lang).into()),
            }
        })
    }
}
