//! Outbound mail: transport seam and the verification email template

mod template;
mod transport;

pub use template::VerificationEmail;
pub use transport::{MailMessage, MailTransport};
