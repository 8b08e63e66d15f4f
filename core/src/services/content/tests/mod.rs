//! Tests for the content services

#[cfg(test)]
mod fixtures;
