#[cfg(test)]
mod redis_client_tests;
#[cfg(test)]
mod token_blacklist_tests;
