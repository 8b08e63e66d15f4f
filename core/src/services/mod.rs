//! Business services containing domain logic and use cases.

pub mod access;
pub mod auth;
pub mod clock;
pub mod content;
pub mod health;
pub mod mail;
pub mod token;
pub mod user;
pub mod verification;

// Re-export commonly used types
pub use access::AccessService;
pub use auth::{AuthService, AuthServiceConfig, Registration};
pub use clock::{Clock, ManualClock, SystemClock};
pub use content::{ArticleService, CategoryService, CommentService, MediaService};
pub use health::{HealthProbe, HealthService};
pub use mail::{MailMessage, MailTransport, VerificationEmail};
pub use token::{InMemoryTokenBlacklist, TokenBlacklist, TokenService};
pub use user::UserService;
pub use verification::{
    DigitSource, RandomDigitSource, ScriptedDigitSource, SeededDigitSource, VerificationManager,
};
