use actix_web::{web, HttpResponse};
use sefr_core::value_objects::VerifyEmailOutcome;

use crate::dto::{UserResponse, VerifyEmailRequest, VerifyEmailResponse};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::i18n;
use crate::state::AppState;

/// Handler for POST /api/auth/verify-email/
///
/// Consumes the pending code. A verified account answers 200 with
/// `code: "already_verified"` and no tokens, whatever code was submitted.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "...",
///     "code": "success",
///     "refresh": "eyJ...",
///     "access": "eyJ...",
///     "user": { "is_email_verified": true, ... }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: wrong, expired, or already consumed code
/// - 404 Not Found: no account with that email
pub async fn verify_email(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    request: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*request, lang)?;

    let outcome = state
        .auth
        .verify_email(&request.email, &request.code)
        .await
        .localized(lang)?;

    let response = match outcome {
        VerifyEmailOutcome::Verified(session) => VerifyEmailResponse {
            message: i18n::message("email_verified", lang),
            code: String::from("success"),
            user: UserResponse::from(&session.user),
            refresh: Some(session.tokens.refresh_token),
            access: Some(session.tokens.access_token),
        },
        VerifyEmailOutcome::AlreadyVerified(user) => VerifyEmailResponse {
            message: i18n::message("already_verified", lang),
            code: String::from("already_verified"),
            refresh: None,
            access: None,
            user: UserResponse::from(user),
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
