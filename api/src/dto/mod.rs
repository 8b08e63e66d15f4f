//! Request and response bodies

pub mod access;
pub mod auth;
pub mod content;
pub mod user;

pub use access::*;
pub use auth::*;
pub use content::*;
pub use user::*;
