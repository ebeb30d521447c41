//! JSON file backed contact store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::{Contact, ContactStore};
use crate::error::StoreError;

/// Contact store keeping every contact in one JSON array on disk.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// store, so a crash never leaves a half-written list. A missing file is
/// an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn read(&self) -> Result<Vec<Contact>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write(&self, contacts: &[Contact]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(contacts).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), contacts = contacts.len(), "Wrote contact store");
        Ok(())
    }

    /// Run a read-modify-write cycle under the store lock.
    fn update<T>(&self, f: impl FnOnce(&mut Vec<Contact>) -> T) -> Result<T, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut contacts = self.read()?;
        let out = f(&mut contacts);
        self.write(&contacts)?;
        Ok(out)
    }
}

impl ContactStore for JsonFileStore {
    fn save(&self, contact: &Contact) -> Result<(), StoreError> {
        self.update(|contacts| match contacts.iter_mut().find(|c| c.id == contact.id) {
            Some(existing) => *existing = contact.clone(),
            None => contacts.push(contact.clone()),
        })
    }

    fn get_all(&self) -> Result<Vec<Contact>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.read()
    }

    fn get(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        Ok(self.get_all()?.into_iter().find(|c| c.id == id))
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.update(|contacts| {
            let before = contacts.len();
            contacts.retain(|c| c.id != id);
            contacts.len() != before
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|contacts| contacts.clear())
    }
}
