//! Email verification codes
//!
//! - `digits` - pluggable digit sources (random, seeded, scripted)
//! - `manager` - the issue / validate / consume lifecycle over user records

mod digits;
mod manager;

#[cfg(test)]
mod tests;

pub use digits::{
    generate_code, DigitSource, RandomDigitSource, ScriptedDigitSource, SeededDigitSource,
};
pub use manager::VerificationManager;
pub use sefr_shared::config::VerificationConfig;
