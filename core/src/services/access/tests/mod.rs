//! Tests for the role and permission service

#[cfg(test)]
mod service_tests;
