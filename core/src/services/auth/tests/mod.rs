//! Tests for the authentication service

#[cfg(test)]
mod mocks;
