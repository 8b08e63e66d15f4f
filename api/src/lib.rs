//! HTTP surface of the Sefr backend
//!
//! - `routes`: endpoint handlers grouped by resource
//! - `middleware`: JWT authentication, CORS and security headers
//! - `handlers`: error mapping and request language detection
//! - `i18n`: English and Persian message catalog

pub mod app;
pub mod dto;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use state::AppState;
