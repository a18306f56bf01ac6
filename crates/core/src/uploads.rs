//! Profile picture storage
//!
//! Uploaded images land in a flat directory; the stored filename is what
//! gets persisted on the user record. Only common web image formats are
//! accepted.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::error::{Error, Result};

/// Extensions accepted for profile pictures.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Manages the uploads directory
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create the manager, making the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store an uploaded image and return the filename to persist.
    #[instrument(skip(self, bytes))]
    pub fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let name = sanitize_filename(original_name)?;
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::Validation(
                "Only image files are allowed (png, jpg, jpeg, gif).".to_string(),
            ));
        }

        fs::write(self.dir.join(&name), bytes)?;
        Ok(name)
    }
}

/// Reduce a client-supplied filename to a safe flat basename.
///
/// Path separators are dropped along with everything before them, and the
/// remaining characters are restricted to a conservative set.
fn sanitize_filename(name: &str) -> Result<String> {
    let basename = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Nothing left, or nothing but dots: not a usable name.
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(Error::Validation("No file selected.".to_string()));
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_accepts_uppercase_extension() {
        let dir = tempdir().unwrap();
        let uploads = UploadStore::open(dir.path()).unwrap();

        let stored = uploads.store("photo.PNG", b"fake-png").unwrap();
        assert_eq!(stored, "photo.PNG");
        assert!(dir.path().join("photo.PNG").exists());
    }

    #[test]
    fn test_store_rejects_wrong_extension() {
        let dir = tempdir().unwrap();
        let uploads = UploadStore::open(dir.path()).unwrap();

        assert!(matches!(
            uploads.store("notes.txt", b"text"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            uploads.store("noextension", b"data"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_store_flattens_traversal_paths() {
        let dir = tempdir().unwrap();
        let uploads = UploadStore::open(dir.path()).unwrap();

        let stored = uploads.store("../../etc/avatar.png", b"img").unwrap();
        assert_eq!(stored, "avatar.png");
        assert!(dir.path().join("avatar.png").exists());
    }

    #[test]
    fn test_store_rejects_empty_name() {
        let dir = tempdir().unwrap();
        let uploads = UploadStore::open(dir.path()).unwrap();

        assert!(matches!(
            uploads.store("", b"img"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            uploads.store("..", b"img"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_odd_characters_are_replaced() {
        let dir = tempdir().unwrap();
        let uploads = UploadStore::open(dir.path()).unwrap();

        let stored = uploads.store("my holiday pic!.jpg", b"img").unwrap();
        assert_eq!(stored, "my_holiday_pic_.jpg");
    }
}
