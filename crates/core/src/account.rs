//! OTP-gated account operations: password reset and profile updates
//!
//! These functions tie the challenge workflow in the session to durable
//! account state. Each protected mutation consumes its challenge at the
//! moment it runs, so a verification is good for exactly one action.

use tracing::{info, instrument};

use crate::credentials;
use crate::error::{Error, Result};
use crate::models::{ProfileUpdate, User};
use crate::otp::{Challenge, Purpose};
use crate::session::Session;
use crate::store::UserRepository;

/// Begin a password reset for whoever `identifier` names.
///
/// Returns the issued challenge when the identity resolves and `None`
/// when it does not. Callers must present both outcomes identically;
/// distinguishing them would confirm which usernames exist.
#[instrument(skip(store, session))]
pub fn request_password_reset<S: UserRepository>(
    store: &S,
    session: &mut Session,
    identifier: &str,
) -> Result<Option<Challenge>> {
    match credentials::resolve_user(store, identifier.trim()) {
        Ok(user) => {
            let challenge = session.request_challenge(Purpose::PasswordReset, &user.username);
            Ok(Some(challenge.clone()))
        }
        Err(Error::NotFound(_)) => {
            info!("password reset requested for unknown identifier");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Finish a password reset with a new password pair.
///
/// Requires a verified password-reset challenge; consuming it here makes
/// the verification single-use even if the store write fails afterwards.
#[instrument(skip_all)]
pub fn complete_password_reset<S: UserRepository>(
    store: &S,
    session: &mut Session,
    new_password: &str,
    confirm_password: &str,
) -> Result<()> {
    if new_password.is_empty() || new_password != confirm_password {
        return Err(Error::Validation(
            "Passwords do not match or are empty.".to_string(),
        ));
    }

    let challenge = session.consume_challenge(Purpose::PasswordReset)?;
    let password_hash = credentials::hash_password(new_password)?;
    store.set_password_hash(challenge.subject(), &password_hash)?;
    info!(username = challenge.subject(), "password reset completed");
    Ok(())
}

/// Issue a profile-update challenge for the logged-in user.
pub fn request_profile_update(session: &mut Session) -> Result<Challenge> {
    let username = session.authenticated_user()?.to_string();
    Ok(session
        .request_challenge(Purpose::ProfileUpdate, &username)
        .clone())
}

/// Apply a profile edit for the logged-in user.
///
/// Requires a verified profile-update challenge bound to the same
/// session identity.
#[instrument(skip(store, session, update))]
pub fn update_profile<S: UserRepository>(
    store: &S,
    session: &mut Session,
    update: &ProfileUpdate,
) -> Result<User> {
    session.authenticated_user()?;
    let challenge = session.consume_challenge(Purpose::ProfileUpdate)?;
    let user = store.update_profile(challenge.subject(), update)?;
    info!(username = %user.username, "profile updated");
    Ok(user)
}

/// Record an uploaded profile picture for the logged-in user.
/// Unlike field edits, this does not require a challenge.
pub fn set_profile_picture<S: UserRepository>(
    store: &S,
    session: &Session,
    filename: &str,
) -> Result<()> {
    let username = session.authenticated_user()?;
    store.set_profile_picture(username, filename)
}
