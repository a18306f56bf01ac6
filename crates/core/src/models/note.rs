//! Note model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A personal note owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub owner: String,
    pub title: String,
    pub content: String,
    pub status: NoteStatus,
    // Absent on records imported from older data files; such notes sort
    // as the earliest possible timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn new(id: u64, owner: String, title: String, content: String) -> Self {
        Self {
            id,
            owner,
            title,
            content,
            status: NoteStatus::Active,
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }

    /// Creation timestamp used for ordering.
    pub fn created_key(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Last-touched timestamp used for ordering; falls back to creation.
    pub fn updated_key(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or_else(|| self.created_key())
    }
}

/// Lifecycle state of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Active,
    Archived,
}

impl NoteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            NoteStatus::Active => "active",
            NoteStatus::Archived => "archived",
        }
    }
}

/// Sort order for note listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSort {
    #[default]
    CreatedDesc,
    CreatedAsc,
    TitleAsc,
    TitleDesc,
    UpdatedDesc,
}

impl NoteSort {
    /// Parse the sort selector used by the listing surface.
    /// Unknown values fall back to newest-first.
    pub fn from_query(value: &str) -> Self {
        match value {
            "date_asc" => NoteSort::CreatedAsc,
            "title_asc" => NoteSort::TitleAsc,
            "title_desc" => NoteSort::TitleDesc,
            "updated_desc" => NoteSort::UpdatedDesc,
            _ => NoteSort::CreatedDesc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_is_active() {
        let note = Note::new(1, "alice".into(), "Groceries".into(), "eggs".into());
        assert_eq!(note.status, NoteStatus::Active);
        assert!(note.created_at.is_some());
        assert!(note.updated_at.is_none());
    }

    #[test]
    fn test_missing_created_at_sorts_earliest() {
        let mut note = Note::new(1, "alice".into(), "t".into(), "c".into());
        note.created_at = None;
        assert_eq!(note.created_key(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_updated_key_falls_back_to_created() {
        let note = Note::new(1, "alice".into(), "t".into(), "c".into());
        assert_eq!(note.updated_key(), note.created_key());
    }

    #[test]
    fn test_sort_from_query() {
        assert_eq!(NoteSort::from_query("date_asc"), NoteSort::CreatedAsc);
        assert_eq!(NoteSort::from_query("title_desc"), NoteSort::TitleDesc);
        assert_eq!(NoteSort::from_query("bogus"), NoteSort::CreatedDesc);
    }
}
