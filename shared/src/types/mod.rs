//! Type definitions module
//!
//! - `language` - language negotiation for localized messages
//! - `pagination` - page-number pagination for list endpoints
//! - `response` - message and health-check envelopes

pub mod language;
pub mod pagination;
pub mod response;

pub use language::Language;
pub use pagination::{PaginatedResponse, Pagination};
pub use response::{HealthResponse, HealthStatus, MessageResponse};
