//! Authentication controllers: register, login, logout, password reset

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use inkpad_core::{account, credentials, session, Address, Purpose, Registration};

use super::{flash_for_error, Outcome, Screen};
use crate::flash::Flash;
use crate::state::AppState;

/// Raw registration form fields, as submitted
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub dob: String,
    pub contact: String,
    pub street: String,
    pub barangay: String,
    pub municipality: String,
    pub province: String,
    pub zipcode: String,
}

/// A one-time code on its way to the user.
///
/// This is the delivery channel, not part of the page feedback: the
/// driver surfaces it separately so the flashes stay identical whether
/// or not a code was actually issued.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

pub fn register(state: &AppState, form: RegisterForm) -> Outcome {
    let Ok(dob) = NaiveDate::parse_from_str(form.dob.trim(), "%Y-%m-%d") else {
        return Outcome::with(
            Screen::Register,
            Flash::danger("Enter date of birth as YYYY-MM-DD."),
        );
    };

    let registration = Registration {
        username: form.username,
        email: form.email,
        password: form.password,
        confirm_password: form.confirm_password,
        first_name: form.first_name,
        middle_name: form.middle_name,
        last_name: form.last_name,
        dob,
        contact: form.contact,
        address: Address {
            street: form.street,
            barangay: form.barangay,
            municipality: form.municipality,
            province: form.province,
            zipcode: form.zipcode,
        },
    };

    match credentials::register(state.store(), registration) {
        Ok(_) => Outcome::with(
            Screen::Login,
            Flash::success("Registration successful. Please log in."),
        ),
        Err(e) => Outcome::with(Screen::Register, flash_for_error(&e)),
    }
}

pub fn login(state: &AppState, sid: Uuid, identifier: &str, password: &str) -> Outcome {
    state.with_session(sid, |session| {
        match session::login(state.store(), session, identifier, password) {
            Ok(_) => Outcome::with(Screen::Home, Flash::success("Logged in.")),
            Err(e) => Outcome::with(Screen::Login, flash_for_error(&e)),
        }
    })
}

pub fn logout(state: &AppState, sid: Uuid) -> Outcome {
    state.with_session(sid, session::logout);
    Outcome::with(Screen::Login, Flash::info("Logged out."))
}

/// Step 1 of forgot-password: request a code for an identifier.
///
/// The flash is the same whether or not the identifier resolved, so the
/// response confirms nothing about which accounts exist.
pub fn forgot_password(
    state: &AppState,
    sid: Uuid,
    identifier: &str,
) -> (Outcome, Option<IssuedCode>) {
    let issued = state.with_session(sid, |session| {
        account::request_password_reset(state.store(), session, identifier)
    });

    match issued {
        Ok(challenge) => {
            let outcome = Outcome::with(
                Screen::ForgotPassword,
                Flash::info("If the account exists, a one-time code has been issued. It expires in 3 minutes."),
            );
            let code = challenge.map(|c| IssuedCode {
                code: c.code().to_string(),
                expires_at: c.expires_at(),
            });
            (outcome, code)
        }
        Err(e) => (
            Outcome::with(Screen::ForgotPassword, flash_for_error(&e)),
            None,
        ),
    }
}

/// Step 2 of forgot-password: check the submitted code.
pub fn verify_reset_code(state: &AppState, sid: Uuid, code: &str) -> Outcome {
    let result = state.with_session(sid, |session| {
        session.verify_challenge(Purpose::PasswordReset, code.trim())
    });

    match result {
        Ok(()) => Outcome::new(Screen::ResetPassword),
        Err(e) => Outcome::with(Screen::ForgotPassword, flash_for_error(&e)),
    }
}

/// Step 3 of forgot-password: set the new password.
pub fn reset_password(state: &AppState, sid: Uuid, password: &str, confirm: &str) -> Outcome {
    let result = state.with_session(sid, |session| {
        account::complete_password_reset(state.store(), session, password, confirm)
    });

    match result {
        Ok(()) => Outcome::with(
            Screen::Login,
            Flash::success("Password updated successfully. Please login."),
        ),
        // Bad input keeps the client on the reset form for another try.
        Err(e @ inkpad_core::Error::Validation(_)) => {
            Outcome::with(Screen::ResetPassword, flash_for_error(&e))
        }
        Err(_) => Outcome::with(
            Screen::ForgotPassword,
            Flash::danger("Unauthorized or session expired. Start forgot password again."),
        ),
    }
}
