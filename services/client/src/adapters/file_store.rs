//! services/client/src/adapters/file_store.rs
//!
//! A `KeyValueStore` backed by one JSON file per key in a local directory.
//! This is the CLI's stand-in for browser local storage.

use jobmate_core::ports::{KeyValueStore, PortError, PortResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory if it doesn't exist.
    pub fn open(dir: impl Into<PathBuf>) -> PortResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| storage_error(&dir, e))?;
            info!("created local storage directory: {}", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a key to a file name, replacing anything outside `[A-Za-z0-9_-]`.
    fn file_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> PortError {
    PortError::Storage(format!("{}: {}", path.display(), e))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let file = self.file_for(key);
        match fs::read_to_string(&file) {
            Ok(content) => {
                debug!("loaded '{}' from {}", key, file.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&file, e)),
        }
    }

    /// Replaces the entry atomically: temp file, then rename.
    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let file = self.file_for(key);
        let tmp = self
            .dir
            .join(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        fs::write(&tmp, value).map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &file).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            storage_error(&file, e)
        })?;
        debug!("stored '{}' in {}", key, file.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let file = self.file_for(key);
        match fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&file, e)),
        }
    }
}
