#[cfg(test)]
mod access_tests;
