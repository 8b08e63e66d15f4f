//! Roles, permissions and their links to users.
//!
//! Every signed-in user may read these tables; only staff may change them.

use actix_web::{web, HttpResponse};
use sefr_core::repositories::{RolePermissionFilter, UserRoleFilter};
use sefr_core::value_objects::{PermissionChanges, PermissionInput, RoleChanges, RoleInput};
use sefr_shared::Pagination;

use crate::dto::{
    PermissionPatchRequest, PermissionRequest, RolePatchRequest, RolePermissionListQuery,
    RolePermissionPatchRequest, RolePermissionRequest, RoleRequest, UserRoleListQuery,
    UserRolePatchRequest, UserRoleRequest,
};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::middleware::{CurrentUser, JwtAuth};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/roles")
            .wrap(JwtAuth::new())
            .service(
                web::resource("/")
                    .route(web::get().to(list_roles))
                    .route(web::post().to(create_role)),
            )
            .service(
                web::resource("/{id}/")
                    .route(web::get().to(get_role))
                    .route(web::put().to(replace_role))
                    .route(web::patch().to(update_role))
                    .route(web::delete().to(delete_role)),
            ),
    )
    .service(
        web::scope("/permissions")
            .wrap(JwtAuth::new())
            .service(
                web::resource("/")
                    .route(web::get().to(list_permissions))
                    .route(web::post().to(create_permission)),
            )
            .service(
                web::resource("/{id}/")
                    .route(web::get().to(get_permission))
                    .route(web::put().to(replace_permission))
                    .route(web::patch().to(update_permission))
                    .route(web::delete().to(delete_permission)),
            ),
    )
    .service(
        web::scope("/role-permissions")
            .wrap(JwtAuth::new())
            .service(
                web::resource("/")
                    .route(web::get().to(list_grants))
                    .route(web::post().to(create_grant)),
            )
            .service(
                web::resource("/{id}/")
                    .route(web::get().to(get_grant))
                    .route(web::put().to(replace_grant))
                    .route(web::patch().to(update_grant))
                    .route(web::delete().to(delete_grant)),
            ),
    )
    .service(
        web::scope("/user-roles")
            .wrap(JwtAuth::new())
            .service(
                web::resource("/")
                    .route(web::get().to(list_assignments))
                    .route(web::post().to(create_assignment)),
            )
            .service(
                web::resource("/{id}/")
                    .route(web::get().to(get_assignment))
                    .route(web::put().to(replace_assignment))
                    .route(web::patch().to(update_assignment))
                    .route(web::delete().to(delete_assignment)),
            ),
    );
}

// Roles

pub async fn list_roles(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
) -> Result<HttpResponse, ApiError> {
    let page = state.access.list_roles(pagination.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_role(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let role = state.access.get_role(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(role))
}

/// Handler for POST /api/roles/
///
/// ## Errors
/// - 403 Forbidden: caller is not staff
/// - 409 Conflict: name already taken
pub async fn create_role(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    request: web::Json<RoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let role = state
        .access
        .create_role(&actor, request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Created().json(role))
}

pub async fn replace_role(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<RoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let changes = RoleChanges::from(RoleInput::from(request));
    let role = state
        .access
        .update_role(&actor, id.into_inner(), changes)
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(role))
}

pub async fn update_role(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<RolePatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let role = state
        .access
        .update_role(&actor, id.into_inner(), request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(role))
}

pub async fn delete_role(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state.access.delete_role(&actor, id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}

// Permissions

pub async fn list_permissions(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
) -> Result<HttpResponse, ApiError> {
    let page = state
        .access
        .list_permissions(pagination.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_permission(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let permission = state.access.get_permission(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(permission))
}

/// Handler for POST /api/permissions/
///
/// ## Errors
/// - 400 Bad Request: blank name, or a codename containing whitespace
/// - 403 Forbidden: caller is not staff
/// - 409 Conflict: name or codename already taken
pub async fn create_permission(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    request: web::Json<PermissionRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let permission = state
        .access
        .create_permission(&actor, request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Created().json(permission))
}

pub async fn replace_permission(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<PermissionRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let changes = PermissionChanges::from(PermissionInput::from(request));
    let permission = state
        .access
        .update_permission(&actor, id.into_inner(), changes)
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(permission))
}

pub async fn update_permission(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<PermissionPatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let permission = state
        .access
        .update_permission(&actor, id.into_inner(), request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(permission))
}

pub async fn delete_permission(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state
        .access
        .delete_permission(&actor, id.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}

// Role permissions

/// Handler for GET /api/role-permissions/?role=<id>&permission=<id>
pub async fn list_grants(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
    query: web::Query<RolePermissionListQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = RolePermissionFilter::from(query.into_inner());
    let page = state
        .access
        .list_grants(&filter, pagination.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_grant(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let grant = state.access.get_grant(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(grant))
}

/// Handler for POST /api/role-permissions/
///
/// ## Errors
/// - 400 Bad Request: unknown role or permission
/// - 403 Forbidden: caller is not staff
/// - 409 Conflict: the role already holds the permission
pub async fn create_grant(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    request: web::Json<RolePermissionRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let grant = state
        .access
        .grant(&actor, request.role, request.permission)
        .await
        .localized(lang)?;
    Ok(HttpResponse::Created().json(grant))
}

pub async fn replace_grant(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<RolePermissionRequest>,
) -> Result<HttpResponse, ApiError> {
    let grant = state
        .access
        .update_grant(&actor, id.into_inner(), request.into_inner().into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(grant))
}

pub async fn update_grant(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<RolePermissionPatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let grant = state
        .access
        .update_grant(&actor, id.into_inner(), request.into_inner().into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(grant))
}

pub async fn delete_grant(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state.access.revoke(&actor, id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}

// User roles

/// Handler for GET /api/user-roles/?user=<uuid>&role=<id>
pub async fn list_assignments(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
    query: web::Query<UserRoleListQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = UserRoleFilter::from(query.into_inner());
    let page = state
        .access
        .list_assignments(&filter, pagination.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_assignment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let assignment = state.access.get_assignment(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(assignment))
}

/// Handler for POST /api/user-roles/
///
/// ## Errors
/// - 400 Bad Request: unknown user or role
/// - 403 Forbidden: caller is not staff
/// - 409 Conflict: the user already holds the role
pub async fn create_assignment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    request: web::Json<UserRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let assignment = state
        .access
        .assign(&actor, request.user, request.role)
        .await
        .localized(lang)?;
    Ok(HttpResponse::Created().json(assignment))
}

pub async fn replace_assignment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<UserRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let assignment = state
        .access
        .update_assignment(&actor, id.into_inner(), request.into_inner().into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(assignment))
}

pub async fn update_assignment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<UserRolePatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let assignment = state
        .access
        .update_assignment(&actor, id.into_inner(), request.into_inner().into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(assignment))
}

pub async fn delete_assignment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state.access.unassign(&actor, id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}
