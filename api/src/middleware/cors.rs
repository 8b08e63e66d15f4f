//! CORS middleware configuration for cross-origin requests.
//!
//! Built from [`CorsConfig`]: development defaults allow any origin, other
//! environments only the origins listed in the configuration.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use sefr_shared::CorsConfig;

/// Creates a CORS middleware instance from the configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| match m.to_uppercase().parse::<Method>() {
            Ok(method) => Some(method),
            Err(_) => {
                tracing::warn!(method = %m, "Ignoring unknown CORS method");
                None
            }
        })
        .collect();

    let mut cors = Cors::default()
        .allowed_methods(methods)
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("Configuring CORS to allow any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
            tracing::info!(origin, "Adding allowed origin");
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    async fn preflight(config: CorsConfig, origin: &str) -> actix_web::http::StatusCode {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/ping")
            .insert_header((header::ORIGIN, origin))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        test::call_service(&app, req).await.status()
    }

    #[actix_rt::test]
    async fn test_development_allows_any_origin() {
        let status = preflight(CorsConfig::development(), "http://localhost:3000").await;
        assert!(status.is_success());
    }

    #[actix_rt::test]
    async fn test_listed_origin_only() {
        let config = CorsConfig {
            allowed_origins: vec!["https://sefr.example.com".to_string()],
            ..CorsConfig::default()
        };
        assert!(preflight(config.clone(), "https://sefr.example.com").await.is_success());
        assert!(!preflight(config, "https://evil.example.com").await.is_success());
    }
}
