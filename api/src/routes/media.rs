//! Media endpoints. Attaching, changing or removing media requires owning
//! the article (or staff).

use actix_web::{web, HttpResponse};
use sefr_core::repositories::MediaFilter;
use sefr_core::value_objects::{MediaChanges, MediaInput};
use sefr_shared::Pagination;

use crate::dto::{MediaListQuery, MediaPatchRequest, MediaRequest};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::middleware::{CurrentUser, JwtAuth};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/media")
            .wrap(JwtAuth::new())
            .service(
                web::resource("/")
                    .route(web::get().to(list_media))
                    .route(web::post().to(create_media)),
            )
            .service(
                web::resource("/{id}/")
                    .route(web::get().to(get_media))
                    .route(web::put().to(replace_media))
                    .route(web::patch().to(update_media))
                    .route(web::delete().to(delete_media)),
            ),
    );
}

pub async fn list_media(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
    query: web::Query<MediaListQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = MediaFilter::from(query.into_inner());
    let page = state
        .media
        .list(&filter, pagination.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_media(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let media = state.media.get(id.into_inner()).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(media))
}

pub async fn create_media(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    request: web::Json<MediaRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let media = state
        .media
        .create(&actor, request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Created().json(media))
}

/// Handler for PUT /api/media/{id}/
///
/// ## Errors
/// - 400 Bad Request: invalid URL or unknown article
/// - 403 Forbidden: caller may not modify the current or the target article
pub async fn replace_media(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<MediaRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let changes = MediaChanges::from(MediaInput::from(request));
    let media = state
        .media
        .update(&actor, id.into_inner(), changes)
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(media))
}

pub async fn update_media(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
    request: web::Json<MediaPatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let media = state
        .media
        .update(&actor, id.into_inner(), request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(media))
}

pub async fn delete_media(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state
        .media
        .delete(&actor, id.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}
