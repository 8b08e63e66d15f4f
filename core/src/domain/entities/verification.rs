//! Email verification state embedded in a [`User`](super::User).
//!
//! A user moves through three states:
//!
//! ```text
//! Unverified-NoCode --issue--> Unverified-CodeIssued --consume(ok)--> Verified
//!                                   |   ^                                 |
//!                                   +---+ issue / consume(fail)           + consume -> AlreadyVerified
//! ```
//!
//! `Verified` is terminal. A pending code and its issue time are stored as a
//! single value so one can never exist without the other.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// An issued, not yet consumed code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCode {
    /// Decimal digits, leading zeros allowed
    pub code: String,
    /// When the code was issued
    pub issued_at: DateTime<Utc>,
}

/// Result of submitting a candidate code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumeOutcome {
    /// The code matched and was unexpired; the user is now verified
    Verified,
    /// Wrong code, stale code, or no code at all
    InvalidOrExpired,
    /// The user was verified before this call; nothing changed
    AlreadyVerified,
}

impl ConsumeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumeOutcome::Verified => "verified",
            ConsumeOutcome::InvalidOrExpired => "invalid_or_expired",
            ConsumeOutcome::AlreadyVerified => "already_verified",
        }
    }
}

/// Verification state of one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationState {
    pending: Option<PendingCode>,
    verified: bool,
}

impl VerificationState {
    /// Fresh state: unverified, no code
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored columns. A verified account never carries a code,
    /// and a half-written code/timestamp pair is read as no code at all.
    pub fn from_parts(
        code: Option<String>,
        issued_at: Option<DateTime<Utc>>,
        verified: bool,
    ) -> Self {
        let pending = match (verified, code, issued_at) {
            (false, Some(code), Some(issued_at)) => Some(PendingCode { code, issued_at }),
            _ => None,
        };
        Self { pending, verified }
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn code(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.code.as_str())
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|p| p.issued_at)
    }

    pub fn pending(&self) -> Option<&PendingCode> {
        self.pending.as_ref()
    }

    /// When the pending code stops being accepted
    pub fn expires_at(&self, timeout: Duration) -> Option<DateTime<Utc>> {
        self.issued_at().map(|issued_at| issued_at + timeout)
    }

    /// Store a new code, replacing any unconsumed one.
    pub fn issue(&mut self, code: String, now: DateTime<Utc>) -> Result<(), AuthError> {
        if self.verified {
            return Err(AuthError::EmailAlreadyVerified);
        }
        self.pending = Some(PendingCode {
            code,
            issued_at: now,
        });
        Ok(())
    }

    /// True iff a code is pending, no more than `timeout` has elapsed since it
    /// was issued (the boundary itself is still valid), and `candidate` is
    /// byte-for-byte equal to it.
    pub fn is_valid(&self, candidate: &str, now: DateTime<Utc>, timeout: Duration) -> bool {
        match &self.pending {
            None => false,
            Some(pending) => {
                let elapsed = now - pending.issued_at;
                elapsed <= timeout && pending.code == candidate
            }
        }
    }

    /// Mark verified without a code, dropping any pending one. Returns false
    /// when the account was already verified.
    pub fn force_verify(&mut self) -> bool {
        if self.verified {
            return false;
        }
        self.verified = true;
        self.pending = None;
        true
    }

    /// Submit a candidate. Only `Verified` changes the state.
    pub fn consume(
        &mut self,
        candidate: &str,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> ConsumeOutcome {
        if self.verified {
            return ConsumeOutcome::AlreadyVerified;
        }
        if !self.is_valid(candidate, now, timeout) {
            return ConsumeOutcome::InvalidOrExpired;
        }
        self.verified = true;
        self.pending = None;
        ConsumeOutcome::Verified
    }
}
