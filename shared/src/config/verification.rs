//! Email verification code settings

use serde::{Deserialize, Serialize};

/// Codes are stored in a `VARCHAR(64)` column
pub const MAX_CODE_LENGTH: usize = 64;

/// Thirty days
pub const MAX_CODE_TIMEOUT_SECONDS: i64 = 30 * 24 * 3600;

/// Verification code length and validity window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of decimal digits in an issued code
    pub code_length: usize,

    /// Seconds an issued code stays valid
    pub code_timeout_seconds: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_timeout_seconds: 3600,
        }
    }
}

impl VerificationConfig {
    /// Whole hours of validity, as reported to clients after registration
    pub fn expires_in_hours(&self) -> i64 {
        self.code_timeout_seconds / 3600
    }

    /// Check the length and timeout are within the supported range
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_CODE_LENGTH).contains(&self.code_length) {
            return Err(format!(
                "verification.code_length must be between 1 and {}, got {}",
                MAX_CODE_LENGTH, self.code_length
            ));
        }
        if !(0..=MAX_CODE_TIMEOUT_SECONDS).contains(&self.code_timeout_seconds) {
            return Err(format!(
                "verification.code_timeout_seconds must be between 0 and {}, got {}",
                MAX_CODE_TIMEOUT_SECONDS, self.code_timeout_seconds
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerificationConfig::default();
        assert_eq!(config.code_length, 6);
        assert_eq!(config.code_timeout_seconds, 3600);
        assert_eq!(config.expires_in_hours(), 1);
    }

    #[test]
    fn test_expires_in_hours_rounds_down() {
        let config = VerificationConfig {
            code_length: 6,
            code_timeout_seconds: 5400,
        };
        assert_eq!(config.expires_in_hours(), 1);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(VerificationConfig::default().validate().is_ok());

        let edge = VerificationConfig {
            code_length: MAX_CODE_LENGTH,
            code_timeout_seconds: MAX_CODE_TIMEOUT_SECONDS,
        };
        assert!(edge.validate().is_ok());

        for (code_length, code_timeout_seconds) in [
            (0, 3600),
            (MAX_CODE_LENGTH + 1, 3600),
            (6, -1),
            (6, MAX_CODE_TIMEOUT_SECONDS + 1),
            (6, i64::MAX),
        ] {
            let config = VerificationConfig {
                code_length,
                code_timeout_seconds,
            };
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }
}
