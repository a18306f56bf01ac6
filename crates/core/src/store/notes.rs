//! Note storage operations

use chrono::Utc;
use tracing::instrument;

use super::Collection;
use crate::error::{Error, Result};
use crate::models::{Note, NoteStatus};

pub struct NoteStore<'a> {
    collection: &'a Collection<Note>,
}

impl<'a> NoteStore<'a> {
    pub fn new(collection: &'a Collection<Note>) -> Self {
        Self { collection }
    }

    /// Append a new note with the next free id.
    ///
    /// Ids are `max + 1` over the live snapshot, assigned under the
    /// collection lock. Single-process assumption.
    #[instrument(skip(self, title, content))]
    pub fn insert(&self, owner: &str, title: String, content: String) -> Result<Note> {
        self.collection.mutate(|notes| {
            let id = notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
            let note = Note::new(id, owner.to_string(), title, content);
            notes.push(note.clone());
            Ok(note)
        })
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: u64) -> Result<Option<Note>> {
        let notes = self.collection.load()?;
        Ok(notes.into_iter().find(|n| n.id == id))
    }

    /// All notes belonging to `owner` in the given lifecycle state.
    pub fn list_for_owner(&self, owner: &str, status: NoteStatus) -> Result<Vec<Note>> {
        let notes = self.collection.load()?;
        Ok(notes
            .into_iter()
            .filter(|n| n.owner == owner && n.status == status)
            .collect())
    }

    /// Mutate a note after checking ownership.
    ///
    /// A missing id and a foreign owner produce the same error so callers
    /// cannot distinguish the two.
    pub fn update_owned<F: FnOnce(&mut Note)>(&self, id: u64, owner: &str, f: F) -> Result<Note> {
        self.collection.mutate(|notes| {
            let note = notes
                .iter_mut()
                .find(|n| n.id == id && n.owner == owner)
                .ok_or(Error::NotFoundOrForbidden)?;
            f(note);
            note.updated_at = Some(Utc::now());
            Ok(note.clone())
        })
    }

    /// Remove a note permanently after checking ownership.
    #[instrument(skip(self))]
    pub fn delete_owned(&self, id: u64, owner: &str) -> Result<()> {
        self.collection.mutate(|notes| {
            let before = notes.len();
            notes.retain(|n| !(n.id == id && n.owner == owner));
            if notes.len() == before {
                return Err(Error::NotFoundOrForbidden);
            }
            Ok(())
        })
    }
}
