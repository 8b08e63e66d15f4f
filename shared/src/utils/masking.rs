//! Masking of personal data before it reaches the logs

/// Mask an email address for logging: `reader@example.com` becomes `r****@example.com`.
/// Values without an `@` are fully masked.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}****@{}", first, domain)
        }
        _ => String::from("****"),
    }
}
