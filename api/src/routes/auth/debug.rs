use actix_web::{web, HttpResponse};
use sefr_core::value_objects::{DebugCode, VerifyEmailOutcome};

use crate::dto::{DebugCodeResponse, DirectVerifyResponse, EmailRequest, UserResponse};
use crate::handlers::{validate, ApiError, Lang, Localize};
use crate::i18n;
use crate::state::AppState;

/// Handler for POST /api/auth/debug/get-code/
///
/// Development only. Returns the pending verification code of an account,
/// issuing one first if none is pending. Answers 403 in every other
/// environment.
pub async fn get_code(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    request: web::Json<EmailRequest>,
) -> Result<HttpResponse, ApiError> {
    if !state.config.environment.is_debug() {
        return Err(ApiError::debug_only(lang));
    }
    validate(&*request, lang)?;

    let code = state
        .auth
        .peek_verification_code(&request.email)
        .await
        .localized(lang)?;

    let response = match code {
        DebugCode::Pending {
            email,
            code,
            expires_at,
        } => {
            tracing::warn!(event = "debug_code_read", "Verification code exposed through debug endpoint");
            DebugCodeResponse::Pending {
                warning: String::from("DO NOT USE IN PRODUCTION"),
                email,
                code,
                expires_at,
            }
        }
        DebugCode::AlreadyVerified => DebugCodeResponse::AlreadyVerified {
            message: i18n::message("already_verified", lang),
            is_verified: true,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Handler for POST /api/auth/debug/direct-verify/
///
/// Development only. Marks the account verified without a code and returns
/// fresh tokens; an already verified account gets `is_verified: true` and no
/// tokens. Answers 403 in every other environment.
///
/// ## Errors
/// - 400 Bad Request: missing or malformed email
/// - 404 Not Found: no account with that email
pub async fn direct_verify(
    Lang(lang): Lang,
    state: web::Data<AppState>,
    request: web::Json<EmailRequest>,
) -> Result<HttpResponse, ApiError> {
    if !state.config.environment.is_debug() {
        return Err(ApiError::debug_only(lang));
    }
    validate(&*request, lang)?;

    let outcome = state.auth.direct_verify(&request.email).await.localized(lang)?;

    let response = match outcome {
        VerifyEmailOutcome::Verified(session) => DirectVerifyResponse::Verified {
            message: i18n::message("verified_directly", lang),
            user: UserResponse::from(&session.user),
            refresh: session.tokens.refresh_token,
            access: session.tokens.access_token,
        },
        VerifyEmailOutcome::AlreadyVerified(_) => DirectVerifyResponse::AlreadyVerified {
            message: i18n::message("already_verified", lang),
            is_verified: true,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
