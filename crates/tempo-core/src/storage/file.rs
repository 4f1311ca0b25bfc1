//! JSON file storage: an in-memory snapshot written back after every change.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{MemoryStorage, Result, Storage};
use crate::error::StorageError;
use crate::models::profile::{NewUser, ProfileUpdate, User};
use crate::models::purchase::{NewPurchase, Purchase};

/// Storage persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    inner: MemoryStorage,
}

impl JsonFileStorage {
    /// Open the file, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let inner = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
            let inner = serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?;
            info!("Loaded storage from {}", path.display());
            inner
        } else {
            debug!("No storage file at {}, starting empty", path.display());
            MemoryStorage::new()
        };

        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a mutation on a copy and keep it only once the copy is on disk.
    ///
    /// `changed` decides whether the outcome needs a write; a failed write
    /// leaves the in-memory state and the id counters untouched.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut MemoryStorage) -> Result<T>,
        changed: impl FnOnce(&T) -> bool,
    ) -> Result<T> {
        let mut next = self.inner.clone();
        let out = op(&mut next)?;

        if changed(&out) {
            self.persist(&next)?;
            self.inner = next;
        }

        Ok(out)
    }

    /// Write a snapshot to a temp file next to the target, then rename.
    fn persist(&self, snapshot: &MemoryStorage) -> Result<()> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let content = serde_json::to_string_pretty(snapshot).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        debug!("Saved storage to {}", self.path.display());
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn get_user(&self, id: u64) -> Result<Option<User>> {
        self.inner.get_user(id)
    }

    fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>> {
        self.inner.get_user_by_uid(uid)
    }

    fn create_user(&mut self, user: NewUser) -> Result<User> {
        self.commit(|inner| inner.create_user(user), |_| true)
    }

    fn update_user(&mut self, uid: &str, updates: ProfileUpdate) -> Result<Option<User>> {
        self.commit(|inner| inner.update_user(uid, updates), Option::is_some)
    }

    fn purchases_by_user(&self, user_id: u64) -> Result<Vec<Purchase>> {
        self.inner.purchases_by_user(user_id)
    }

    fn create_purchase(&mut self, purchase: NewPurchase) -> Result<Purchase> {
        self.commit(|inner| inner.create_purchase(purchase), |_| true)
    }

    fn delete_purchase(&mut self, id: u64, user_id: u64) -> Result<bool> {
        self.commit(|inner| inner.delete_purchase(id, user_id), |deleted| *deleted)
    }
}
