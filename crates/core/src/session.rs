//! Client session state and the OTP workflow over it
//!
//! One `Session` per connected client. It carries the authenticated
//! identity, the failed-login counter, and at most one live challenge per
//! purpose. The challenge slots are typed fields, not a keyed map: the
//! two flows are independent namespaces and must not observe each other.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::credentials;
use crate::error::{Error, Result};
use crate::invariants::assert_challenge_invariants;
use crate::models::User;
use crate::otp::{Challenge, Purpose};
use crate::store::UserRepository;

#[derive(Debug, Default)]
pub struct Session {
    user: Option<String>,
    login_attempts: u32,
    password_reset: Option<Challenge>,
    profile_update: Option<Challenge>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The authenticated username, if any.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Guard for protected operations.
    pub fn authenticated_user(&self) -> Result<&str> {
        self.user.as_deref().ok_or(Error::Unauthenticated)
    }

    pub fn login_attempts(&self) -> u32 {
        self.login_attempts
    }

    /// Count a failed login. There is no lockout threshold; the counter
    /// only feeds logging and whatever the front-end chooses to do.
    pub fn record_login_failure(&mut self) -> u32 {
        self.login_attempts += 1;
        warn!(attempts = self.login_attempts, "failed login attempt");
        self.login_attempts
    }

    /// Drop everything and set the authenticated identity.
    pub fn establish(&mut self, username: &str) {
        *self = Self::default();
        self.user = Some(username.to_string());
    }

    /// Drop everything: identity, counters, challenges.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&self, purpose: Purpose) -> &Option<Challenge> {
        match purpose {
            Purpose::PasswordReset => &self.password_reset,
            Purpose::ProfileUpdate => &self.profile_update,
        }
    }

    fn slot_mut(&mut self, purpose: Purpose) -> &mut Option<Challenge> {
        match purpose {
            Purpose::PasswordReset => &mut self.password_reset,
            Purpose::ProfileUpdate => &mut self.profile_update,
        }
    }

    /// Issue a new challenge for a purpose, replacing any earlier one.
    /// Requesting again is the only way to retire an unconsumed code early.
    pub fn request_challenge(&mut self, purpose: Purpose, subject: &str) -> &Challenge {
        self.request_challenge_at(purpose, subject, Utc::now())
    }

    #[instrument(skip(self))]
    pub fn request_challenge_at(
        &mut self,
        purpose: Purpose,
        subject: &str,
        now: DateTime<Utc>,
    ) -> &Challenge {
        info!(purpose = purpose.label(), "issuing one-time code");
        let challenge = Challenge::issue(subject, now);
        assert_challenge_invariants(&challenge);
        self.slot_mut(purpose).insert(challenge)
    }

    /// Check a submitted code against the live challenge.
    ///
    /// Expiry clears the slot. A mismatch leaves the challenge in place,
    /// retryable until it expires; there is no attempt limit.
    pub fn verify_challenge(&mut self, purpose: Purpose, submitted: &str) -> Result<()> {
        self.verify_challenge_at(purpose, submitted, Utc::now())
    }

    pub fn verify_challenge_at(
        &mut self,
        purpose: Purpose,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let slot = self.slot_mut(purpose);
        let challenge = slot.as_mut().ok_or(Error::NoActiveChallenge)?;
        if challenge.is_expired(now) {
            *slot = None;
            return Err(Error::Expired);
        }
        if !challenge.matches(submitted) {
            return Err(Error::CodeMismatch);
        }
        challenge.mark_verified();
        info!(purpose = purpose.label(), "one-time code verified");
        Ok(())
    }

    /// Take the verified challenge for a purpose, clearing the slot.
    ///
    /// The protected action calls this at the moment it mutates state;
    /// success is one-shot.
    pub fn consume_challenge(&mut self, purpose: Purpose) -> Result<Challenge> {
        self.consume_challenge_at(purpose, Utc::now())
    }

    pub fn consume_challenge_at(
        &mut self,
        purpose: Purpose,
        now: DateTime<Utc>,
    ) -> Result<Challenge> {
        let slot = self.slot_mut(purpose);
        let challenge = slot.as_ref().ok_or(Error::NoActiveChallenge)?;
        if challenge.is_expired(now) {
            *slot = None;
            return Err(Error::Expired);
        }
        if !challenge.is_verified() {
            return Err(Error::NotVerified);
        }
        // Checked as Some above.
        Ok(slot.take().ok_or(Error::NoActiveChallenge)?)
    }

    /// Pure read used for flow gating; never mutates the slot.
    pub fn is_verified(&self, purpose: Purpose) -> bool {
        self.is_verified_at(purpose, Utc::now())
    }

    pub fn is_verified_at(&self, purpose: Purpose, now: DateTime<Utc>) -> bool {
        self.slot(purpose)
            .as_ref()
            .is_some_and(|c| c.is_verified() && !c.is_expired(now))
    }
}

/// Log in against the user store.
///
/// Both an unknown identifier and a wrong password fail identically and
/// bump the attempt counter. Success clears the whole session before
/// setting the identity.
#[instrument(skip(store, session, password))]
pub fn login<S: UserRepository>(
    store: &S,
    session: &mut Session,
    identifier: &str,
    password: &str,
) -> Result<User> {
    let invalid = || Error::Validation("Invalid username/email or password.".to_string());

    let user = match credentials::resolve_user(store, identifier.trim()) {
        Ok(user) => user,
        Err(Error::NotFound(_)) => {
            session.record_login_failure();
            return Err(invalid());
        }
        Err(e) => return Err(e),
    };

    if !credentials::verify_password(&user.password_hash, password) {
        session.record_login_failure();
        return Err(invalid());
    }

    session.establish(&user.username);
    crate::invariants::assert_session_identity(session);
    info!(username = %user.username, "logged in");
    Ok(user)
}

/// Log out, dropping all session state unconditionally.
pub fn logout(session: &mut Session) {
    if let Some(username) = session.user() {
        info!(username, "logged out");
    }
    session.clear();
}
