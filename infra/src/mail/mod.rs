//! Outbound mail transports
//!
//! [`SmtpMailTransport`] delivers through an SMTP relay. [`LogMailTransport`]
//! writes each message to the log and keeps a copy, for development and tests.

mod log_transport;
mod smtp;

pub use log_transport::LogMailTransport;
pub use smtp::SmtpMailTransport;
