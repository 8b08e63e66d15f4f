//! Cache module for Redis-backed state
//!
//! Redis holds the revoked refresh-token ids, each with a TTL matching the
//! token's remaining lifetime so the set never outgrows the live tokens.

pub mod redis_client;
pub mod token_blacklist;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use token_blacklist::RedisTokenBlacklist;
