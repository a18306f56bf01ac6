//! Profile controllers: view, picture upload, and the OTP-gated edit flow

use chrono::NaiveDate;
use uuid::Uuid;

use inkpad_core::{account, Purpose, ProfileUpdate, User, UserRepository};

use super::auth::IssuedCode;
use super::{flash_for_error, Outcome, Screen};
use crate::flash::Flash;
use crate::state::AppState;

/// Raw profile edit fields, as submitted. Blank fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub dob: String,
    pub contact: String,
    pub address: String,
    pub email: String,
}

impl ProfileForm {
    fn into_update(self) -> ProfileUpdate {
        fn opt(value: String) -> Option<String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }

        ProfileUpdate {
            first_name: opt(self.first_name),
            middle_name: opt(self.middle_name),
            last_name: opt(self.last_name),
            dob: NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d").ok(),
            contact: opt(self.contact),
            address: opt(self.address),
            email: opt(self.email),
        }
    }
}

/// The profile page: the logged-in user's record.
pub fn view(state: &AppState, sid: Uuid) -> (Outcome, Option<User>) {
    let username = state.with_session(sid, |session| session.user().map(String::from));
    let Some(username) = username else {
        return (
            Outcome::with(Screen::Login, Flash::warning("Please login first.")),
            None,
        );
    };

    match state.store().find_user_by_username(&username) {
        Ok(Some(user)) => (Outcome::new(Screen::Profile), Some(user)),
        Ok(None) => (
            // The session names an account that no longer resolves.
            Outcome::with(Screen::Login, Flash::danger("Account not found.")),
            None,
        ),
        Err(e) => (Outcome::with(Screen::Profile, flash_for_error(&e)), None),
    }
}

/// Store an uploaded profile picture and persist the reference.
pub fn upload_picture(state: &AppState, sid: Uuid, filename: &str, bytes: &[u8]) -> Outcome {
    // Guard before touching the filesystem; anonymous clients must not
    // leave files behind.
    let logged_in = state.with_session(sid, |session| session.user().is_some());
    if !logged_in {
        return Outcome::with(Screen::Login, Flash::warning("Please login first."));
    }

    let stored = match state.uploads().store(filename, bytes) {
        Ok(stored) => stored,
        Err(e) => return Outcome::with(Screen::EditProfile, flash_for_error(&e)),
    };

    let result = state.with_session(sid, |session| {
        account::set_profile_picture(state.store(), session, &stored)
    });

    match result {
        Ok(()) => Outcome::with(Screen::EditProfile, Flash::success("Profile picture updated!")),
        Err(e) => Outcome::with(Screen::EditProfile, flash_for_error(&e)),
    }
}

/// Issue a one-time code gating the next profile edit.
pub fn request_code(state: &AppState, sid: Uuid) -> (Outcome, Option<IssuedCode>) {
    let result = state.with_session(sid, account::request_profile_update);

    match result {
        Ok(challenge) => (
            Outcome::with(
                Screen::EditProfile,
                Flash::info("A one-time code has been issued. It expires in 3 minutes."),
            ),
            Some(IssuedCode {
                code: challenge.code().to_string(),
                expires_at: challenge.expires_at(),
            }),
        ),
        Err(e) => (Outcome::with(Screen::EditProfile, flash_for_error(&e)), None),
    }
}

/// Check a submitted profile-update code.
pub fn verify_code(state: &AppState, sid: Uuid, code: &str) -> Outcome {
    let result = state.with_session(sid, |session| {
        session.verify_challenge(Purpose::ProfileUpdate, code.trim())
    });

    match result {
        Ok(()) => Outcome::with(
            Screen::EditProfile,
            Flash::success("OTP verified. You may update your profile now."),
        ),
        Err(e) => Outcome::with(Screen::EditProfile, flash_for_error(&e)),
    }
}

/// Apply the profile edit. Requires a verified code.
pub fn update(state: &AppState, sid: Uuid, form: ProfileForm) -> Outcome {
    let update = form.into_update();
    let result = state.with_session(sid, |session| {
        account::update_profile(state.store(), session, &update)
    });

    match result {
        Ok(_) => Outcome::with(Screen::Profile, Flash::success("Profile updated successfully!")),
        Err(e @ inkpad_core::Error::Unauthenticated) => {
            Outcome::with(Screen::Login, flash_for_error(&e))
        }
        Err(e) => Outcome::with(Screen::EditProfile, flash_for_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::controller::auth::{self, RegisterForm};
    use tempfile::tempdir;

    fn logged_in_state(dir: &tempfile::TempDir) -> (AppState, Uuid) {
        let state = AppState::new(&AppConfig {
            data_dir: dir.path().join("data"),
            uploads_dir: dir.path().join("uploads"),
        })
        .unwrap();

        auth::register(
            &state,
            RegisterForm {
                username: "alice".into(),
                email: "alice@x.com".into(),
                password: "Secret1!".into(),
                confirm_password: "Secret1!".into(),
                first_name: "Alice".into(),
                last_name: "Reyes".into(),
                dob: "1995-05-05".into(),
                contact: "0917".into(),
                ..Default::default()
            },
        );
        let sid = state.open_session();
        auth::login(&state, sid, "alice", "Secret1!");
        (state, sid)
    }

    #[test]
    fn test_view_returns_record() {
        let dir = tempdir().unwrap();
        let (state, sid) = logged_in_state(&dir);

        let (outcome, user) = view(&state, sid);
        assert_eq!(outcome.next, Screen::Profile);
        assert_eq!(user.unwrap().username, "alice");
    }

    #[test]
    fn test_update_requires_verified_code() {
        let dir = tempdir().unwrap();
        let (state, sid) = logged_in_state(&dir);

        let outcome = update(
            &state,
            sid,
            ProfileForm {
                contact: "0999".into(),
                ..Default::default()
            },
        );
        assert_eq!(
            outcome.flashes[0].message,
            "No OTP found. Please request a new one."
        );
    }

    #[test]
    fn test_full_profile_update_flow() {
        let dir = tempdir().unwrap();
        let (state, sid) = logged_in_state(&dir);

        let (_, issued) = request_code(&state, sid);
        let issued = issued.unwrap();

        let outcome = verify_code(&state, sid, &issued.code);
        assert_eq!(outcome.flashes[0].severity, crate::flash::Severity::Success);

        let outcome = update(
            &state,
            sid,
            ProfileForm {
                contact: "0999".into(),
                ..Default::default()
            },
        );
        assert_eq!(outcome.next, Screen::Profile);

        let (_, user) = view(&state, sid);
        assert_eq!(user.unwrap().contact, "0999");

        // The verification was spent; another edit needs a new code.
        let outcome = update(
            &state,
            sid,
            ProfileForm {
                contact: "0888".into(),
                ..Default::default()
            },
        );
        assert_eq!(
            outcome.flashes[0].message,
            "No OTP found. Please request a new one."
        );
    }

    #[test]
    fn test_upload_picture_persists_reference() {
        let dir = tempdir().unwrap();
        let (state, sid) = logged_in_state(&dir);

        let outcome = upload_picture(&state, sid, "me.png", b"fake-image");
        assert_eq!(outcome.flashes[0].message, "Profile picture updated!");

        let (_, user) = view(&state, sid);
        assert_eq!(user.unwrap().profile_picture.as_deref(), Some("me.png"));
    }

    #[test]
    fn test_upload_rejects_non_image() {
        let dir = tempdir().unwrap();
        let (state, sid) = logged_in_state(&dir);

        let outcome = upload_picture(&state, sid, "malware.exe", b"bits");
        assert_eq!(outcome.flashes[0].severity, crate::flash::Severity::Danger);
    }

    #[test]
    fn test_request_code_requires_login() {
        let dir = tempdir().unwrap();
        let (state, _) = logged_in_state(&dir);
        let stranger = state.open_session();

        let (outcome, issued) = request_code(&state, stranger);
        assert!(issued.is_none());
        assert_eq!(outcome.flashes[0].message, "Please login first.");
    }
}
