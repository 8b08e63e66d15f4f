//! Unauthenticated system endpoints

use actix_web::{web, HttpResponse};

use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/system").route("/health/", web::get().to(health)));
}

/// Handler for GET /api/system/health/
///
/// 200 when the store answers a ping, 503 otherwise. The body is the same
/// either way.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let report = state.health.check().await;
    if report.is_healthy() {
        HttpResponse::Ok().json(report)
    } else {
        tracing::warn!(database = %report.database, event = "health_degraded", "Health check failed");
        HttpResponse::ServiceUnavailable().json(report)
    }
}
