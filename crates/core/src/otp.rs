//! Session-scoped one-time codes
//!
//! A challenge binds a random 6-digit code to a subject identity for a
//! single purpose. Codes live for three minutes and are checked lazily:
//! an expired challenge is discarded when someone tries to use it, never
//! by a background sweep.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Seconds a code stays valid after being issued.
pub const CODE_TTL_SECS: i64 = 180;

/// Length of a generated code in digits.
pub const CODE_LEN: usize = 6;

/// The independent flows a challenge can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    PasswordReset,
    ProfileUpdate,
}

impl Purpose {
    pub fn label(&self) -> &'static str {
        match self {
            Purpose::PasswordReset => "password reset",
            Purpose::ProfileUpdate => "profile update",
        }
    }
}

/// A pending one-time code bound to a subject identity.
///
/// Lifecycle: issued → (verified) → consumed, or discarded on expiry.
#[derive(Debug, Clone)]
pub struct Challenge {
    subject: String,
    code: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    verified: bool,
}

impl Challenge {
    /// Issue a fresh challenge for `subject`, valid for three minutes.
    pub fn issue(subject: &str, now: DateTime<Utc>) -> Self {
        Self {
            subject: subject.to_string(),
            code: generate_code(),
            issued_at: now,
            expires_at: now + Duration::seconds(CODE_TTL_SECS),
            verified: false,
        }
    }

    /// The identity this challenge vouches for.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The issued code. Surfacing it to the caller is this system's
    /// delivery channel.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub(crate) fn mark_verified(&mut self) {
        self.verified = true;
    }

    /// Whether `submitted` matches the issued code. Leading zeros are
    /// significant, so comparison is on the exact string form.
    pub fn matches(&self, submitted: &str) -> bool {
        self.code == submitted
    }
}

/// Generate a uniformly random zero-padded numeric code.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..=999_999))
}
