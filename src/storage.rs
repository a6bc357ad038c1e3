// File: ./src/storage.rs
// On-disk JSON documents: location, locking and atomic replacement
use crate::error::{Result, StoreError};
use directories::ProjectDirs;
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const TASKS_FILE: &str = "tasks.json";
pub const ONGOING_FILE: &str = "ongoing_chapters.json";

/// Overrides every other data directory setting. Used for test isolation.
pub const DATA_DIR_ENV: &str = "SYLTRACK_DATA_DIR";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    data_dir: PathBuf,
}

impl LocalStorage {
    /// Opens (and creates if needed) a storage directory.
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| StoreError::io(&data_dir, e))?;
        Ok(Self { data_dir })
    }

    pub fn env_data_dir() -> Option<PathBuf> {
        env::var(DATA_DIR_ENV)
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }

    /// `$SYLTRACK_DATA_DIR`, else the platform data directory.
    pub fn default_data_dir() -> Option<PathBuf> {
        Self::env_data_dir().or_else(|| {
            ProjectDirs::from("com", "syltrack", "syltrack").map(|p| p.data_dir().to_path_buf())
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    pub fn ongoing_path(&self) -> PathBuf {
        self.data_dir.join(ONGOING_FILE)
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents).map_err(|e| StoreError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, path).map_err(|e| StoreError::io(path, e))?;
        Ok(())
    }

    /// Runs `f` while holding an exclusive advisory lock next to `path`.
    pub fn with_lock<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoreError::io(&lock_path, e))?;
        file.lock_exclusive()
            .map_err(|e| StoreError::io(&lock_path, e))?;

        let result = f();
        let _ = FileExt::unlock(&file);
        result
    }

    /// Serializes `value` as pretty JSON and replaces `path` with it.
    pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::json(path, e))?;
        Self::with_lock(path, || Self::atomic_write(path, &json))
    }

    /// Reads a JSON document. `Ok(None)` means the file does not exist yet.
    pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        let value = serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))?;
        Ok(Some(value))
    }
}
