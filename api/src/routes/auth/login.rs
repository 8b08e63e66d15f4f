use actix_web::{web, HttpResponse};

use crate::dto::{LoginRequest, SessionResponse};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::state::AppState;

/// Handler for POST /api/auth/login/
///
/// `login` is an email address when it contains `@`, a username otherwise.
///
/// ## Errors
/// - 400 Bad Request: missing login or password
/// - 401 Unauthorized: unknown user, wrong password, or inactive account
pub async fn login(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*request, lang)?;

    let session = state
        .auth
        .login(&request.login, &request.password)
        .await
        .localized(lang)?;

    Ok(HttpResponse::Ok().json(SessionResponse::from(session)))
}
