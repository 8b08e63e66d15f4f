use actix_web::{web, HttpResponse};
use sefr_core::services::Registration;
use sefr_shared::masking::mask_email;

use crate::dto::{RegisterRequest, RegisterResponse};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::i18n;
use crate::state::AppState;

/// Handler for POST /api/auth/register/
///
/// Creates the account, issues a verification code and emails it when mail
/// delivery is enabled. A failed send does not fail the registration; it is
/// reported in `verification.email_status`.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "reader@example.com",
///     "password": "correct-horse",
///     "first_name": "Sara",
///     "last_name": "Ahmadi",
///     "username": "sara"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "refresh": "eyJ...",
///     "access": "eyJ...",
///     "user": { "id": "...", "username": "sara", "is_email_verified": false, ... },
///     "verification": {
///         "email_status": "sent",
///         "email_sent_to": "reader@example.com",
///         "expires_in_hours": 1,
///         "is_verified": false
///     },
///     "message": "..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid email, weak password, missing names
/// - 409 Conflict: email or username already taken
pub async fn register(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    validate(&request, lang)?;

    tracing::info!(email = %mask_email(&request.email), event = "register_attempt", "Processing registration");

    let outcome = state
        .auth
        .register(Registration {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            username: request.username,
        })
        .await
        .localized(lang)?;

    let response = RegisterResponse::new(
        outcome.session,
        &outcome.email_status,
        outcome.expires_in_hours,
        i18n::message("registered", lang),
    );
    Ok(HttpResponse::Created().json(response))
}
