//! JSON snapshot persistence for a single named collection
//!
//! Each collection lives in its own file shaped as `{"<name>": [ ... ]}`.
//! Every write replaces the whole snapshot; a missing file is created with
//! an empty collection the first time the store is opened.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;

pub struct Collection<T> {
    name: &'static str,
    path: PathBuf,
    // Serializes read-modify-write cycles within this process. Cross-process
    // access is out of contract.
    lock: Mutex<()>,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    pub(crate) fn open(name: &'static str, dir: &Path) -> Result<Self> {
        let collection = Self {
            name,
            path: dir.join(format!("{name}.json")),
            lock: Mutex::new(()),
            _marker: PhantomData,
        };
        if !collection.path.exists() {
            collection.write_snapshot(&[])?;
        }
        Ok(collection)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection from disk.
    pub fn load(&self) -> Result<Vec<T>> {
        let _guard = self.guard();
        self.read_snapshot()
    }

    /// Replace the full collection on disk.
    pub fn save_all(&self, items: &[T]) -> Result<()> {
        let _guard = self.guard();
        self.write_snapshot(items)
    }

    /// Run a read-modify-write cycle under the collection lock.
    ///
    /// When the closure returns an error, nothing is written and the
    /// snapshot on disk stays as it was.
    #[instrument(skip_all, fields(collection = self.name))]
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R>) -> Result<R> {
        let _guard = self.guard();
        let mut items = self.read_snapshot()?;
        let out = f(&mut items)?;
        self.write_snapshot(&items)?;
        Ok(out)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded data lives on disk, so a poisoned lock has nothing
        // inconsistent to protect.
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read_snapshot(&self) -> Result<Vec<T>> {
        let raw = fs::read_to_string(&self.path)?;
        let mut doc: Value = serde_json::from_str(&raw)?;
        match doc.get_mut(self.name) {
            Some(items) => Ok(serde_json::from_value(items.take())?),
            None => Ok(Vec::new()),
        }
    }

    fn write_snapshot(&self, items: &[T]) -> Result<()> {
        let mut doc = serde_json::Map::new();
        doc.insert(self.name.to_string(), serde_json::to_value(items)?);
        let text = serde_json::to_string_pretty(&Value::Object(doc))?;

        // Write the sibling first so a failed write never truncates the
        // live snapshot.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: u64,
        body: String,
    }

    fn entry(id: u64, body: &str) -> Entry {
        Entry {
            id,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_open_creates_empty_snapshot() {
        let dir = tempdir().unwrap();
        let collection: Collection<Entry> = Collection::open("entries", dir.path()).unwrap();

        let raw = fs::read_to_string(collection.path()).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["entries"], serde_json::json!([]));
        assert!(collection.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let collection: Collection<Entry> = Collection::open("entries", dir.path()).unwrap();

        collection
            .save_all(&[entry(1, "first"), entry(2, "second")])
            .unwrap();

        let items = collection.load().unwrap();
        assert_eq!(items, vec![entry(1, "first"), entry(2, "second")]);

        // On-disk shape keeps the collection name as the top-level key.
        let raw = fs::read_to_string(collection.path()).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["entries"][1]["body"], "second");
    }

    #[test]
    fn test_mutate_persists_changes() {
        let dir = tempdir().unwrap();
        let collection: Collection<Entry> = Collection::open("entries", dir.path()).unwrap();

        let id = collection
            .mutate(|items| {
                items.push(entry(7, "hello"));
                Ok(7u64)
            })
            .unwrap();
        assert_eq!(id, 7);
        assert_eq!(collection.load().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_mutate_writes_nothing() {
        let dir = tempdir().unwrap();
        let collection: Collection<Entry> = Collection::open("entries", dir.path()).unwrap();
        collection.save_all(&[entry(1, "keep me")]).unwrap();

        let result: Result<()> = collection.mutate(|items| {
            items.clear();
            Err(crate::error::Error::NotFoundOrForbidden)
        });
        assert!(result.is_err());
        assert_eq!(collection.load().unwrap(), vec![entry(1, "keep me")]);
    }
}
