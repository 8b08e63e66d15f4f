use actix_web::{web, HttpResponse};
use sefr_shared::types::response::MessageResponse;

use crate::dto::RefreshTokenRequest;
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::i18n;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for POST /api/auth/logout/
///
/// Blacklists the submitted refresh token. Requires authentication via
/// Bearer token, and the refresh token must belong to the caller.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Request Body
///
/// ```json
/// { "refresh": "eyJ..." }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "message": "Logged out successfully" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: refresh token malformed, expired, revoked, or foreign
/// - 401 Unauthorized: missing or invalid access token
pub async fn logout(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*request, lang)?;

    state
        .auth
        .logout(&request.refresh, auth.user_id)
        .await
        .localized(lang)?;

    tracing::info!(user_id = %auth.user_id, event = "logout", "User logged out");

    Ok(HttpResponse::Ok().json(MessageResponse::new(i18n::message("logged_out", lang))))
}
