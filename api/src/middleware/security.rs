//! Security middleware: HTTPS enforcement and response security headers.
//!
//! Production rejects plain-HTTP requests (other than from localhost) and
//! adds the headers; staging only adds the headers; development does neither.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use sefr_shared::Environment;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use crate::handlers::error::{language_from_headers, ApiError};
use sefr_core::errors::DomainError;

/// Security middleware factory
#[derive(Debug, Clone, Copy)]
pub struct SecurityMiddleware {
    enforce_https: bool,
    add_security_headers: bool,
}

impl SecurityMiddleware {
    pub fn for_environment(environment: Environment) -> Self {
        let middleware = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::headers_only(),
            Environment::Development => Self::development(),
        };
        tracing::info!(
            enforce_https = middleware.enforce_https,
            add_headers = middleware.add_security_headers,
            "Security middleware configured"
        );
        middleware
    }

    pub fn development() -> Self {
        Self {
            enforce_https: false,
            add_security_headers: false,
        }
    }

    pub fn production() -> Self {
        Self {
            enforce_https: true,
            add_security_headers: true,
        }
    }

    /// Security headers without HTTPS enforcement
    pub fn headers_only() -> Self {
        Self {
            enforce_https: false,
            add_security_headers: true,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            enforce_https: self.enforce_https,
            add_security_headers: self.add_security_headers,
        }))
    }
}

pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    enforce_https: bool,
    add_security_headers: bool,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
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
        let enforce_https = self.enforce_https;
        let add_security_headers = self.add_security_headers;

        Box::pin(async move {
            if enforce_https && !is_secure_request(&req) {
                tracing::warn!(method = %req.method(), path = req.path(), "Insecure request blocked");
                let lang = language_from_headers(req.headers());
                let error = ApiError::domain(DomainError::forbidden("HTTPS required"), lang);
                return Ok(req.error_response(error).map_into_right_body());
            }

            let mut response = service.call(req).await?.map_into_left_body();
            if add_security_headers {
                add_security_response_headers(&mut response);
            }
            Ok(response)
        })
    }
}

/// HTTPS, as seen directly or through `Forwarded`/`X-Forwarded-Proto`, or localhost
fn is_secure_request(req: &ServiceRequest) -> bool {
    let conn_info = req.connection_info();
    if conn_info.scheme() == "https" {
        return true;
    }

    let host = conn_info.host();
    host.starts_with("localhost") || host.starts_with("127.0.0.1") || host.starts_with("[::1]")
}

fn add_security_response_headers<B>(response: &mut ServiceResponse<B>) {
    let headers = response.headers_mut();

    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none';"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), geolocation=(), microphone=(), payment=()"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header::HeaderMap, StatusCode};
    use actix_web::{test, web, App, HttpResponse};

    async fn get(middleware: SecurityMiddleware, host: &str, proto: Option<&str>) -> (StatusCode, HeaderMap) {
        let app = test::init_service(
            App::new()
                .wrap(middleware)
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/ping").insert_header((header::HOST, host));
        if let Some(proto) = proto {
            req = req.insert_header(("x-forwarded-proto", proto));
        }
        let res = test::call_service(&app, req.to_request()).await;
        (res.status(), res.headers().clone())
    }

    #[actix_rt::test]
    async fn test_production_blocks_plain_http() {
        let (status, _) = get(SecurityMiddleware::production(), "api.sefr.example", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, headers) = get(SecurityMiddleware::production(), "api.sefr.example", Some("https")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    }

    #[actix_rt::test]
    async fn test_production_allows_localhost() {
        let (status, _) = get(SecurityMiddleware::production(), "localhost:8000", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_development_adds_nothing() {
        let (status, headers) = get(SecurityMiddleware::development(), "api.sefr.example", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }
}
