//! JSON snapshot storage layer for Inkpad

mod collection;
mod notes;
mod traits;
mod users;

use std::fs;
use std::path::Path;

use tracing::instrument;

use crate::error::Result;
use crate::models::{Note, NoteStatus, ProfileUpdate, User};

pub use collection::Collection;
pub use notes::NoteStore;
pub use traits::{NoteRepository, Storage, UserRepository};
pub use users::UserStore;

/// Main store handle over the data directory
pub struct Store {
    users: Collection<User>,
    notes: Collection<Note>,
}

impl Store {
    /// Open or create the store in the given data directory
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            users: Collection::open("users", dir)?,
            notes: Collection::open("notes", dir)?,
        })
    }

    /// Get user store
    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.users)
    }

    /// Get note store
    pub fn notes(&self) -> NoteStore<'_> {
        NoteStore::new(&self.notes)
    }
}

// Implement repository traits for Store
// This enables using Store through the trait interface

impl UserRepository for Store {
    fn create_user(&self, user: &User) -> Result<()> {
        self.users().create(user)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users().find_by_username(username)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users().find_by_email(email)
    }

    fn update_profile(&self, username: &str, update: &ProfileUpdate) -> Result<User> {
        self.users().apply_profile(username, update)
    }

    fn set_password_hash(&self, username: &str, password_hash: &str) -> Result<()> {
        self.users().set_password_hash(username, password_hash)
    }

    fn set_profile_picture(&self, username: &str, filename: &str) -> Result<()> {
        self.users().set_profile_picture(username, filename)
    }
}

impl NoteRepository for Store {
    fn insert_note(&self, owner: &str, title: String, content: String) -> Result<Note> {
        self.notes().insert(owner, title, content)
    }

    fn find_note_by_id(&self, id: u64) -> Result<Option<Note>> {
        self.notes().find_by_id(id)
    }

    fn list_notes_for_owner(&self, owner: &str, status: NoteStatus) -> Result<Vec<Note>> {
        self.notes().list_for_owner(owner, status)
    }

    fn set_note_status(&self, id: u64, owner: &str, status: NoteStatus) -> Result<Note> {
        self.notes().update_owned(id, owner, |note| note.status = status)
    }

    fn edit_note(&self, id: u64, owner: &str, title: String, content: String) -> Result<Note> {
        self.notes().update_owned(id, owner, |note| {
            note.title = title;
            note.content = content;
        })
    }

    fn delete_note(&self, id: u64, owner: &str) -> Result<()> {
        self.notes().delete_owned(id, owner)
    }
}
