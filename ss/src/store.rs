//! Session store trait and its in-memory and file-backed implementations

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use log::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Key/value persistence for session flags
///
/// Values are plain strings; absence of a key is the "unset" state.
pub trait SessionStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Volatile store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given pairs
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = values.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// JSON object file on disk
///
/// Every mutation is a read-modify-write under an exclusive lock on a
/// sidecar `.lock` file, and lands via temp file + rename so readers never
/// observe a half-written document.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Open a store at `path`; a directory gets the default file name
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let mut path = path.as_ref().to_path_buf();
        if path.is_dir() {
            path = path.join(crate::DEFAULT_FILE_NAME);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let lock_path = sidecar(&path, ".lock");
        debug!("Opened session store at {}", path.display());
        Ok(Self { path, lock_path })
    }

    /// Path of the backing JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored pairs, sorted by key
    pub fn entries(&self) -> StoreResult<Vec<(String, String)>> {
        Ok(self.read_all()?.into_iter().collect())
    }

    fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(values).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let tmp_path = sidecar(&self.path, ".tmp");
        fs::write(&tmp_path, content).map_err(|e| StoreError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }

    /// Current document for a write; a corrupt one is replaced, not merged
    fn read_for_update(&self) -> StoreResult<BTreeMap<String, String>> {
        match self.read_all() {
            Err(StoreError::Json { path, source }) => {
                warn!("Discarding corrupt session file {}: {}", path.display(), source);
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn update<F>(&self, mutate: F) -> StoreResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| StoreError::io(&self.lock_path, e))?;
        lock.lock_exclusive()
            .map_err(|_| StoreError::Lock(self.lock_path.clone()))?;

        let result = self.read_for_update().and_then(|mut values| {
            mutate(&mut values);
            self.write_all(&values)
        });

        unlock(&lock);
        result
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })?;
        info!("Stored session key {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|values| {
            values.remove(key);
        })?;
        info!("Removed session key {}", key);
        Ok(())
    }
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from(crate::DEFAULT_FILE_NAME));
    name.push(suffix);
    path.with_file_name(name)
}

fn unlock(file: &File) {
    if let Err(e) = FileExt::unlock(file) {
        debug!("Failed to release session lock: {}", e);
    }
}
