//! Authentication route handlers
//!
//! Registration, login, email verification and token lifecycle endpoints.

pub mod debug;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod resend;
pub mod verify_email;

use actix_web::web;

use crate::middleware::JwtAuth;

/// Mount the `/auth` scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register/", web::post().to(register::register))
            .route("/login/", web::post().to(login::login))
            .route("/verify-email/", web::post().to(verify_email::verify_email))
            .route(
                "/resend-verification/",
                web::post().to(resend::resend_verification),
            )
            .route("/token/refresh/", web::post().to(refresh::refresh_token))
            .route("/debug/get-code/", web::post().to(debug::get_code))
            .route("/debug/direct-verify/", web::post().to(debug::direct_verify))
            .service(
                web::resource("/logout/")
                    .wrap(JwtAuth::new())
                    .route(web::post().to(logout::logout)),
            ),
    );
}
