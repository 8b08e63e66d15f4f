//! User accounts as seen by other users: listing, profile reads, edits

mod service;

#[cfg(test)]
mod tests;

pub use service::UserService;
