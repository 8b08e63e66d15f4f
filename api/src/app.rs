//! Application factory
//!
//! Builds the Actix-web application over a prepared [`AppState`]; used by the
//! binary and by the integration tests.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error, HttpRequest, HttpResponse};
use sefr_core::errors::DomainError;
use tracing_actix_web::TracingLogger;

use crate::handlers::error::language_from_headers;
use crate::handlers::{ApiError, Lang};
use crate::middleware::{create_cors, SecurityMiddleware};
use crate::routes;
use crate::state::AppState;

/// Create and configure the application
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors = create_cors(&state.config.cors);
    let security = SecurityMiddleware::for_environment(state.config.environment);
    let json_limit = state.config.server.max_payload_size;

    App::new()
        .app_data(state)
        .app_data(
            web::JsonConfig::default()
                .limit(json_limit)
                .error_handler(|err, req| malformed(err.to_string(), req)),
        )
        .app_data(web::QueryConfig::default().error_handler(|err, req| malformed(err.to_string(), req)))
        .app_data(web::PathConfig::default().error_handler(|err, req| malformed(err.to_string(), req)))
        // Innermost first: security checks run inside CORS, inside the request span
        .wrap(security)
        .wrap(cors)
        .wrap(TracingLogger::default())
        .configure(routes::configure)
        .default_service(web::route().to(not_found))
}

/// Body, query and path extraction failures share the validation error shape
fn malformed(message: String, req: &HttpRequest) -> Error {
    ApiError::malformed(message, language_from_headers(req.headers())).into()
}

async fn not_found(Lang(lang): Lang) -> Result<HttpResponse, ApiError> {
    Err(ApiError::domain(DomainError::not_found("Resource"), lang))
}
