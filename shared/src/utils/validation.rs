//! Field validators shared by the services and the HTTP layer

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+\-]+$").expect("username regex is valid"));

/// Check if an email address is well formed
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Usernames: 1-150 characters of letters, digits and `@ . + - _`
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (1..=150).contains(&len) && USERNAME_REGEX.is_match(username)
}

/// Check if a URL uses http or https
pub fn is_valid_url(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && url.len() > "https://".len()
}

/// Check if a string is not blank
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Check that the character count lies within bounds
pub fn char_length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

/// Reasons a password is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    TooShort,
    EntirelyNumeric,
}

/// Check password strength: minimum length and not only digits
pub fn check_password(password: &str, min_length: usize) -> Result<(), PasswordIssue> {
    if password.chars().count() < min_length {
        return Err(PasswordIssue::TooShort);
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(PasswordIssue::EntirelyNumeric);
    }
    Ok(())
}
