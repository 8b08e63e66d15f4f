//! Roles, permissions, and who holds them.
//!
//! Any signed-in user may read the tables; only staff may change them.

mod service;

#[cfg(test)]
mod tests;

pub use service::AccessService;
