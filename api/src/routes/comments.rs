//! Comment endpoints

use actix_web::{web, HttpResponse};
use sefr_shared::Pagination;

use crate::dto::{CommentListQuery, CommentRequest, CommentUpdateRequest};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::middleware::{CurrentUser, JwtAuth};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .wrap(JwtAuth::new())
            .service(
                web::resource("/")
                    .route(web::get().to(list_comments))
                    .route(web::post().to(create_comment)),
            )
            .service(
                web::resource("/{id}/")
                    .route(web::get().to(get_comment))
                    .route(web::put().to(update_comment))
                    .route(web::delete().to(delete_comment)),
            ),
    );
}

pub async fn list_comments(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
    query: web::Query<CommentListQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = state
        .comments
        .list(query.article, pagination.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_comment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let comment = state.comments.get(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(comment))
}

/// Handler for POST /api/comments/
///
/// Content must be at least 10 characters; a reply's parent must be on the
/// same article. New comments start unapproved.
pub async fn create_comment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(author): CurrentUser,
    request: web::Json<CommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let comment = state
        .comments
        .create(&author, request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn update_comment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<CommentUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*request, lang)?;

    let comment = state
        .comments
        .update(&actor, id.into_inner(), &request.content)
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state
        .comments
        .delete(&actor, id.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}
