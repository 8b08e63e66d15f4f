use actix_web::{web, HttpResponse};

use crate::dto::{RefreshResponse, RefreshTokenRequest};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::state::AppState;

/// Handler for POST /api/auth/token/refresh/
///
/// Exchanges a refresh token for a new access token. The refresh token itself
/// is not rotated.
///
/// ## Errors
/// - 401 Unauthorized: expired, tampered, or blacklisted refresh token
/// - 401 Unauthorized: the account was deactivated
pub async fn refresh_token(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*request, lang)?;

    let access = state.auth.refresh(&request.refresh).await.localized(lang)?;

    Ok(HttpResponse::Ok().json(RefreshResponse { access }))
}
