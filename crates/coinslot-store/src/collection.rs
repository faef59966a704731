//! Whole-collection JSON snapshot persistence.
//!
//! Each record kind lives in one flat JSON file holding the entire
//! collection. The file is read once at open; every mutation rewrites the
//! whole collection through a temp file + rename, so a failed write leaves
//! both the in-memory view and the on-disk file consistent with the last
//! successful write (the current mutation is lost, nothing is corrupted).
//!
//! A per-collection mutex makes every mutation atomic with respect to
//! concurrent requests against the same collection. Callers must not hold
//! results of `get` across a mutation and expect freshness; use
//! [`JsonCollection::update`] to read-modify-write under the lock.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// A record persisted in a [`JsonCollection`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + 'static {
    /// The unique key of this record within its collection.
    fn key(&self) -> &str;
}

/// One snapshot-file-backed collection of records.
pub struct JsonCollection<T: Record> {
    path: PathBuf,
    records: Mutex<Vec<T>>,
}

impl<T: Record> JsonCollection<T> {
    /// Open the collection, loading the snapshot file if it exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice(&bytes)?
        } else {
            Vec::new()
        };
        tracing::debug!(path = %path.display(), count = records.len(), "Opened ledger collection");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Rewrite the snapshot file from the given records.
    ///
    /// Writes to a sibling temp file first and renames it into place, so a
    /// crash mid-write cannot truncate the previous snapshot.
    fn persist(&self, records: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<T>>> {
        self.records
            .lock()
            .map_err(|_| StoreError::lock_poisoned("collection lock poisoned"))
    }

    /// Insert a new record. Fails with `Duplicate` if the key exists.
    pub fn insert(&self, record: T) -> Result<()> {
        let mut records = self.lock()?;
        if records.iter().any(|r| r.key() == record.key()) {
            return Err(StoreError::duplicate(record.key()));
        }
        records.push(record);
        if let Err(e) = self.persist(&records) {
            records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Insert unless the key exists, returning the stored record and
    /// whether this call created it. Never mutates an existing record.
    pub fn get_or_insert(&self, record: T) -> Result<(T, bool)> {
        let mut records = self.lock()?;
        if let Some(existing) = records.iter().find(|r| r.key() == record.key()) {
            return Ok((existing.clone(), false));
        }
        records.push(record.clone());
        if let Err(e) = self.persist(&records) {
            records.pop();
            return Err(e);
        }
        Ok((record, true))
    }

    /// Get a record by key.
    pub fn get(&self, key: &str) -> Result<Option<T>> {
        let records = self.lock()?;
        Ok(records.iter().find(|r| r.key() == key).cloned())
    }

    /// True when a record with the key exists.
    pub fn contains(&self, key: &str) -> Result<bool> {
        let records = self.lock()?;
        Ok(records.iter().any(|r| r.key() == key))
    }

    /// Read-modify-write a record atomically.
    ///
    /// The closure runs under the collection lock against a copy of the
    /// record; if it returns `Err`, neither memory nor disk change. The
    /// mutation is committed only after the closure succeeds and the
    /// snapshot is persisted.
    pub fn update<R, E, F>(&self, key: &str, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut T) -> std::result::Result<R, E>,
        E: From<StoreError>,
    {
        let mut records = self.lock().map_err(E::from)?;
        let idx = records
            .iter()
            .position(|r| r.key() == key)
            .ok_or_else(|| E::from(StoreError::not_found(key)))?;

        let mut updated = records[idx].clone();
        let out = f(&mut updated)?;

        let prev = std::mem::replace(&mut records[idx], updated);
        if let Err(e) = self.persist(&records) {
            records[idx] = prev;
            return Err(E::from(e));
        }
        Ok(out)
    }

    /// Clone out all records.
    pub fn list(&self) -> Result<Vec<T>> {
        let records = self.lock()?;
        Ok(records.clone())
    }

    /// Number of records.
    pub fn count(&self) -> Result<usize> {
        let records = self.lock()?;
        Ok(records.len())
    }
}
