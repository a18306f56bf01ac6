//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (JSON snapshot files, mock, future embedded store).

use crate::error::Result;
use crate::models::{Note, NoteStatus, ProfileUpdate, User};

/// User repository operations
pub trait UserRepository {
    /// Create a new user; usernames are unique
    fn create_user(&self, user: &User) -> Result<()>;

    /// Find user by exact username
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find user by email, case-insensitively
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Merge a profile edit and recompute derived fields
    fn update_profile(&self, username: &str, update: &ProfileUpdate) -> Result<User>;

    /// Replace the stored password hash
    fn set_password_hash(&self, username: &str, password_hash: &str) -> Result<()>;

    /// Record the stored profile picture filename
    fn set_profile_picture(&self, username: &str, filename: &str) -> Result<()>;
}

/// Note repository operations
pub trait NoteRepository {
    /// Append a new note with the next free id
    fn insert_note(&self, owner: &str, title: String, content: String) -> Result<Note>;

    /// Find note by id
    fn find_note_by_id(&self, id: u64) -> Result<Option<Note>>;

    /// List an owner's notes in the given lifecycle state
    fn list_notes_for_owner(&self, owner: &str, status: NoteStatus) -> Result<Vec<Note>>;

    /// Change lifecycle state, owner-checked
    fn set_note_status(&self, id: u64, owner: &str, status: NoteStatus) -> Result<Note>;

    /// Replace title and content, owner-checked
    fn edit_note(&self, id: u64, owner: &str, title: String, content: String) -> Result<Note>;

    /// Remove permanently, owner-checked
    fn delete_note(&self, id: u64, owner: &str) -> Result<()>;
}

/// Combined storage interface
///
/// Implementations may be backed by snapshot files or mocks.
pub trait Storage: UserRepository + NoteRepository {}

// Blanket implementation: any type implementing both traits implements Storage
impl<T> Storage for T where T: UserRepository + NoteRepository {}
