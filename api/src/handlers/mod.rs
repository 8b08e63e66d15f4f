pub mod error;

pub use error::{ApiError, Lang, Localize};

use validator::Validate;

use crate::i18n::Language;

/// Run the `validator` rules of a request body
pub fn validate<T: Validate>(request: &T, lang: Language) -> Result<(), ApiError> {
    request.validate().map_err(|errors| {
        tracing::debug!(errors = %errors, "Request validation failed");
        ApiError::invalid(errors, lang)
    })
}
