//! Article endpoints, addressed by slug

use actix_web::{web, HttpResponse};
use sefr_core::repositories::ArticleFilter;
use sefr_shared::Pagination;

use crate::dto::{ArticleListQuery, ArticleRequest, StatusResponse};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::middleware::{CurrentUser, JwtAuth};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/articles")
            .wrap(JwtAuth::new())
            .service(
                web::resource("/")
                    .route(web::get().to(list_articles))
                    .route(web::post().to(create_article)),
            )
            .route("/{slug}/like/", web::post().to(like_article))
            .route("/{slug}/view/", web::post().to(view_article))
            .service(
                web::resource("/{slug}/")
                    .route(web::get().to(get_article))
                    .route(web::put().to(update_article))
                    .route(web::delete().to(delete_article)),
            ),
    );
}

/// Handler for GET /api/articles/?status=&category=&author=
///
/// Newest first.
pub async fn list_articles(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    pagination: web::Query<Pagination>,
    query: web::Query<ArticleListQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = ArticleFilter::from(query.into_inner());
    let page = state
        .articles
        .list(&filter, pagination.into_inner())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(page))
}

/// Handler for GET /api/articles/{slug}/
///
/// The article with its media, comments, likes count and views count.
pub async fn get_article(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let detail = state.articles.detail(&slug).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Handler for POST /api/articles/
///
/// The caller becomes the author. The slug is derived from the title and
/// suffixed with `-2`, `-3`, ... on collision.
pub async fn create_article(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(author): CurrentUser,
    request: web::Json<ArticleRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let article = state
        .articles
        .create(&author, request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Created().json(article))
}

/// Handler for PUT /api/articles/{slug}/ (author or staff)
pub async fn update_article(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    slug: web::Path<String>,
    request: web::Json<ArticleRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    let article = state
        .articles
        .update(&actor, &slug, request.into())
        .await
        .localized(lang)?;
    Ok(HttpResponse::Ok().json(article))
}

/// Handler for DELETE /api/articles/{slug}/ (author or staff)
pub async fn delete_article(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state.articles.delete(&actor, &slug).await.localized(lang)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Handler for POST /api/articles/{slug}/like/
///
/// Idempotent: `{"status": "liked"}` the first time, `{"status": "already liked"}` after.
pub async fn like_article(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.articles.like(&user, &slug).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(StatusResponse::new(outcome.as_str())))
}

/// Handler for POST /api/articles/{slug}/view/
pub async fn view_article(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state.articles.view(&user, &slug).await.localized(lang)?;
    Ok(HttpResponse::Ok().json(StatusResponse::new("viewed")))
}
