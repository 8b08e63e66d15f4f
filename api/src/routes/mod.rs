//! Route table for the `/api` scope

pub mod access;
pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod media;
pub mod system;
pub mod users;

use actix_web::web;

/// Mount every endpoint under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth::configure)
            .configure(users::configure)
            .configure(categories::configure)
            .configure(articles::configure)
            .configure(comments::configure)
            .configure(media::configure)
            .configure(access::configure)
            .configure(system::configure),
    );
}
