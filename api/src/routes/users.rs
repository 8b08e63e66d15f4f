//! User account endpoints

use actix_web::{web, HttpResponse};
use sefr_shared::Pagination;
use uuid::Uuid;

use crate::dto::{UpdateUserRequest, UserResponse};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::middleware::{CurrentUser, JwtAuth};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(JwtAuth::new())
            .route("/", web::get().to(list_users))
            .route("/me/", web::get().to(me))
            .service(
                web::resource("/{id}/")
                    .route(web::get().to(get_user))
                    .route(web::patch().to(update_user))
                    .route(web::delete().to(delete_user)),
            ),
    );
}

/// Handler for GET /api/users/
pub async fn list_users(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
) -> Result<HttpResponse, ApiError> {
    let page = state.users.list(pagination.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(page.map(UserResponse::from)))
}

/// Handler for GET /api/users/me/
pub async fn me(CurrentUser(user): CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(user))
}

/// Handler for GET /api/users/{id}/
pub async fn get_user(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user = state.users.get(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Handler for PATCH /api/users/{id}/
///
/// Owner or staff only. A new password goes through the same strength rules
/// as registration.
///
/// ## Errors
/// - 400 Bad Request: weak password or blank names
/// - 403 Forbidden: caller is neither the owner nor staff
/// - 409 Conflict: username already taken
pub async fn update_user(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<Uuid>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let user = state
        .users
        .update(&actor, id.into_inner(), request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Handler for DELETE /api/users/{id}/
pub async fn delete_user(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state
        .users
        .delete(&actor, id.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}
