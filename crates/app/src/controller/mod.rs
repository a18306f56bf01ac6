//! Request controllers
//!
//! Each controller function is one request/response pair: it runs a core
//! workflow, translates every outcome into flash feedback, and names the
//! screen the client should land on next. No markup is rendered here.

pub mod auth;
pub mod notes;
pub mod profile;

use inkpad_core::Error;

use crate::flash::Flash;

/// Screen the presentation layer should show next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Home,
    ForgotPassword,
    ResetPassword,
    Archive,
    Profile,
    EditProfile,
}

/// Outcome of one request
#[derive(Debug)]
pub struct Outcome {
    pub flashes: Vec<Flash>,
    pub next: Screen,
}

impl Outcome {
    pub fn new(next: Screen) -> Self {
        Self {
            flashes: Vec::new(),
            next,
        }
    }

    pub fn with(next: Screen, flash: Flash) -> Self {
        Self {
            flashes: vec![flash],
            next,
        }
    }
}

/// Translate a core error into user-facing feedback.
///
/// Store and hashing failures stay generic on purpose; their details go
/// to the log, not the client.
pub(crate) fn flash_for_error(err: &Error) -> Flash {
    match err {
        Error::Unauthenticated => Flash::warning("Please login first."),
        Error::NoActiveChallenge => Flash::danger("No OTP found. Please request a new one."),
        Error::Expired => Flash::danger("OTP expired. Please request a new one."),
        Error::CodeMismatch => Flash::danger("Invalid OTP. Please try again."),
        Error::NotVerified => Flash::danger("Please verify OTP before updating."),
        Error::NotFoundOrForbidden => Flash::danger("Note not found or access denied."),
        Error::Validation(message) => Flash::danger(message.clone()),
        Error::NotFound(_) => Flash::danger("Not found."),
        Error::PasswordHash(_) | Error::Io(_) | Error::Serialization(_) => {
            tracing::error!(error = %err, "request failed");
            Flash::danger("Something went wrong. Please try again.")
        }
    }
}
