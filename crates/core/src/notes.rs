//! Note lifecycle and listing

use tracing::instrument;

use crate::error::{Error, Result};
use crate::invariants::assert_note_invariants;
use crate::models::{Note, NoteSort, NoteStatus};
use crate::store::NoteRepository;

/// Owner-scoped operations over the note store.
pub struct NoteService<'a, S: NoteRepository> {
    store: &'a S,
}

impl<'a, S: NoteRepository> NoteService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a note. The title must be non-empty after trimming.
    #[instrument(skip(self, title, content))]
    pub fn create(&self, owner: &str, title: &str, content: &str) -> Result<Note> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Title is required.".to_string()));
        }
        let note = self
            .store
            .insert_note(owner, title.to_string(), content.trim().to_string())?;
        assert_note_invariants(&note);
        Ok(note)
    }

    /// Replace title and content of an owned note.
    #[instrument(skip(self, title, content))]
    pub fn edit(&self, id: u64, owner: &str, title: &str, content: &str) -> Result<Note> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Title is required.".to_string()));
        }
        self.store
            .edit_note(id, owner, title.to_string(), content.trim().to_string())
    }

    /// An owner's notes in the given state, sorted.
    pub fn list(&self, owner: &str, status: NoteStatus, sort: NoteSort) -> Result<Vec<Note>> {
        let mut notes = self.store.list_notes_for_owner(owner, status)?;
        sort_notes(&mut notes, sort);
        Ok(notes)
    }

    pub fn archive(&self, id: u64, owner: &str) -> Result<Note> {
        self.store.set_note_status(id, owner, NoteStatus::Archived)
    }

    pub fn restore(&self, id: u64, owner: &str) -> Result<Note> {
        self.store.set_note_status(id, owner, NoteStatus::Active)
    }

    /// Remove a note for good. There is no tombstone.
    pub fn delete(&self, id: u64, owner: &str) -> Result<()> {
        self.store.delete_note(id, owner)
    }
}

fn sort_notes(notes: &mut [Note], sort: NoteSort) {
    match sort {
        NoteSort::CreatedDesc => notes.sort_by(|a, b| b.created_key().cmp(&a.created_key())),
        NoteSort::CreatedAsc => notes.sort_by_key(Note::created_key),
        NoteSort::TitleAsc => notes.sort_by_key(|n| n.title.to_lowercase()),
        NoteSort::TitleDesc => {
            notes.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        NoteSort::UpdatedDesc => notes.sort_by(|a, b| b.updated_key().cmp(&a.updated_key())),
    }
}
