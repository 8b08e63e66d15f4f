use actix_web::{web, HttpResponse};
use sefr_core::value_objects::{EmailStatus, ResendOutcome};

use crate::dto::{EmailRequest, ResendResponse, ResendVerification};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::i18n;
use crate::state::AppState;

/// Handler for POST /api/auth/resend-verification/
///
/// Replaces any pending code with a fresh one. Unlike registration, a failed
/// send surfaces as a 500.
pub async fn resend_verification(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    request: web::Json<EmailRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*request, lang)?;

    let outcome = state
        .auth
        .resend_verification(&request.email)
        .await
        .localized(lang)?;

    let response = match outcome {
        ResendOutcome::Sent {
            email,
            expires_in_hours,
        } => {
            let status = if state.config.mail.delivery_enabled {
                EmailStatus::Sent
            } else {
                EmailStatus::Skipped
            };
            ResendResponse {
                message: i18n::message("code_resent", lang),
                code: String::from("success"),
                verification: Some(ResendVerification {
                    email_status: status.describe(),
                    email_sent_to: email,
                    expires_in_hours,
                }),
            }
        }
        ResendOutcome::AlreadyVerified => ResendResponse {
            message: i18n::message("already_verified", lang),
            code: String::from("already_verified"),
            verification: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
