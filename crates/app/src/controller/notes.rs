//! Note controllers: listing, CRUD, and the archive

use uuid::Uuid;

use inkpad_core::{Note, NoteService, NoteSort, NoteStatus};

use super::{flash_for_error, Outcome, Screen};
use crate::flash::Flash;
use crate::state::AppState;

fn current_user(state: &AppState, sid: Uuid) -> Option<String> {
    state.with_session(sid, |session| session.user().map(String::from))
}

fn login_required() -> Outcome {
    Outcome::with(Screen::Login, Flash::warning("Please login first."))
}

/// The home listing: the user's active notes, sorted per the query.
pub fn home(state: &AppState, sid: Uuid, sort_by: &str) -> (Outcome, Vec<Note>) {
    let Some(user) = current_user(state, sid) else {
        return (login_required(), Vec::new());
    };

    let service = NoteService::new(state.store());
    match service.list(&user, NoteStatus::Active, NoteSort::from_query(sort_by)) {
        Ok(notes) => (Outcome::new(Screen::Home), notes),
        Err(e) => (
            Outcome::with(Screen::Home, flash_for_error(&e)),
            Vec::new(),
        ),
    }
}

pub fn create(state: &AppState, sid: Uuid, title: &str, content: &str) -> Outcome {
    let Some(user) = current_user(state, sid) else {
        return login_required();
    };

    let service = NoteService::new(state.store());
    match service.create(&user, title, content) {
        Ok(_) => Outcome::with(Screen::Home, Flash::success("Note created.")),
        Err(e) => Outcome::with(Screen::Home, flash_for_error(&e)),
    }
}

pub fn edit(state: &AppState, sid: Uuid, id: u64, title: &str, content: &str) -> Outcome {
    let Some(user) = current_user(state, sid) else {
        return login_required();
    };

    let service = NoteService::new(state.store());
    match service.edit(id, &user, title, content) {
        Ok(_) => Outcome::with(Screen::Home, Flash::success("Note updated.")),
        Err(e) => Outcome::with(Screen::Home, flash_for_error(&e)),
    }
}

pub fn archive(state: &AppState, sid: Uuid, id: u64) -> Outcome {
    let Some(user) = current_user(state, sid) else {
        return login_required();
    };

    let service = NoteService::new(state.store());
    match service.archive(id, &user) {
        Ok(_) => Outcome::with(Screen::Home, Flash::info("Note moved to archive.")),
        Err(e) => Outcome::with(Screen::Home, flash_for_error(&e)),
    }
}

/// The archive listing: archived notes, newest first.
pub fn archive_view(state: &AppState, sid: Uuid) -> (Outcome, Vec<Note>) {
    let Some(user) = current_user(state, sid) else {
        return (login_required(), Vec::new());
    };

    let service = NoteService::new(state.store());
    match service.list(&user, NoteStatus::Archived, NoteSort::default()) {
        Ok(notes) => (Outcome::new(Screen::Archive), notes),
        Err(e) => (
            Outcome::with(Screen::Archive, flash_for_error(&e)),
            Vec::new(),
        ),
    }
}

pub fn restore(state: &AppState, sid: Uuid, id: u64) -> Outcome {
    let Some(user) = current_user(state, sid) else {
        return login_required();
    };

    let service = NoteService::new(state.store());
    match service.restore(id, &user) {
        Ok(_) => Outcome::with(Screen::Archive, Flash::success("Note restored.")),
        Err(e) => Outcome::with(Screen::Archive, flash_for_error(&e)),
    }
}

pub fn delete(state: &AppState, sid: Uuid, id: u64) -> Outcome {
    let Some(user) = current_user(state, sid) else {
        return login_required();
    };

    let service = NoteService::new(state.store());
    match service.delete(id, &user) {
        Ok(()) => Outcome::with(Screen::Archive, Flash::danger("Note permanently deleted.")),
        Err(e) => Outcome::with(Screen::Archive, flash_for_error(&e)),
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
    fn test_guard_redirects_logged_out_client() {
        let dir = tempdir().unwrap();
        let (state, _) = logged_in_state(&dir);
        let stranger = state.open_session();

        let outcome = create(&state, stranger, "title", "content");
        assert_eq!(outcome.next, Screen::Login);

        let (outcome, notes) = home(&state, stranger, "date_desc");
        assert_eq!(outcome.next, Screen::Login);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_create_and_home_listing() {
        let dir = tempdir().unwrap();
        let (state, sid) = logged_in_state(&dir);

        create(&state, sid, "Groceries", "eggs");
        let (outcome, notes) = home(&state, sid, "date_desc");
        assert_eq!(outcome.next, Screen::Home);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Groceries");
    }

    #[test]
    fn test_archive_cycle_moves_between_listings() {
        let dir = tempdir().unwrap();
        let (state, sid) = logged_in_state(&dir);

        create(&state, sid, "old news", "");
        let (_, notes) = home(&state, sid, "date_desc");
        let id = notes[0].id;

        archive(&state, sid, id);
        let (_, active) = home(&state, sid, "date_desc");
        let (_, archived) = archive_view(&state, sid);
        assert!(active.is_empty());
        assert_eq!(archived.len(), 1);

        restore(&state, sid, id);
        let (_, active) = home(&state, sid, "date_desc");
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_delete_unknown_id_flashes_denial() {
        let dir = tempdir().unwrap();
        let (state, sid) = logged_in_state(&dir);

        let outcome = delete(&state, sid, 999);
        assert_eq!(
            outcome.flashes[0].message,
            "Note not found or access denied."
        );
    }
}
