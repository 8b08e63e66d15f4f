pub mod auth;
pub mod cors;
pub mod security;

pub use auth::{AuthContext, CurrentUser, JwtAuth};
pub use cors::create_cors;
pub use security::SecurityMiddleware;
