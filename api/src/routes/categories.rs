//! Category endpoints. Any authenticated user may change categories.

use actix_web::{web, HttpResponse};
use sefr_shared::Pagination;

use crate::dto::{CategoryListQuery, CategoryRequest};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::middleware::JwtAuth;
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .wrap(JwtAuth::new())
            .service(
                web::resource("/")
                    .route(web::get().to(list_categories))
                    .route(web::post().to(create_category)),
            )
            .service(
                web::resource("/{id}/")
                    .route(web::get().to(get_category))
                    .route(web::put().to(update_category))
                    .route(web::delete().to(delete_category)),
            ),
    );
}

/// Handler for GET /api/categories/?parent=<id>
pub async fn list_categories(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
    query: web::Query<CategoryListQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = state
        .categories
        .list(query.parent, pagination.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_category(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let category = state.categories.get(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(category))
}

/// Handler for POST /api/categories/
///
/// ## Errors
/// - 400 Bad Request: blank name or unknown parent
/// - 409 Conflict: name or explicit slug already taken
pub async fn create_category(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    request: web::Json<CategoryRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let category = state.categories.create(request.into()).await.localized(lang)?;
    Ok(HttpResponse::Created().json(category))
}

pub async fn update_category(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
    request: web::Json<CategoryRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let category = state
        .categories
        .update(id.into_inner(), request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(category))
}

pub async fn delete_category(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state.categories.delete(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}
