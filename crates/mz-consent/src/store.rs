//! Key-value storage for consent records.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ConsentError;

/// String key-value store holding serialized consent records.
pub trait ConsentStore: Send + Sync {
    /// Read the value under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Io`] if the backing storage cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, ConsentError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Io`] if the value cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), ConsentError>;

    /// Delete `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Io`] if the value exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), ConsentError>;
}

impl<S: ConsentStore + ?Sized> ConsentStore for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, ConsentError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), ConsentError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), ConsentError> {
        (**self).remove(key)
    }
}

/// File-backed store: one `{key}.json` file per key.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store in `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the record files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ConsentStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, ConsentError> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), ConsentError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConsentError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsentStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, ConsentError> {
        Ok(self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), ConsentError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConsentError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip_creates_dir() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path().join("nested/consent"));

        assert_eq!(store.read("k").unwrap(), None);
        store.write("k", "{}").unwrap();
        assert_eq!(store.read("k").unwrap(), Some("{}".to_owned()));
        assert!(temp.path().join("nested/consent/k.json").exists());
    }

    #[test]
    fn test_file_store_remove_missing_is_ok() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path());

        store.remove("absent").unwrap();
        store.write("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        store.write("k", "a").unwrap();
        store.write("k", "b").unwrap();
        assert_eq!(store.read("k").unwrap(), Some("b".to_owned()));
    }
}
