//! Byte storage for the persisted settings document.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{Result, TuneForgeError};

pub trait SettingsStorage: Send + Sync {
    /// Read the whole file. A missing file is `TuneForgeError::NotFound`.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
    /// Create `dir` and its parents if needed.
    fn ensure_dir(&self, dir: &Path) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct FsStorage;

impl SettingsStorage for FsStorage {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => TuneForgeError::NotFound(path.to_path_buf()),
            _ => TuneForgeError::IoError(err),
        })
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::write(path, bytes)?;
        Ok(())
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        Ok(())
    }
}

/// In-memory file map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.lock().insert(path.into(), bytes.into());
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }
}

impl SettingsStorage for MemoryStorage {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.get(path)
            .ok_or_else(|| TuneForgeError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.insert(path, bytes);
        Ok(())
    }

    fn ensure_dir(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fs_storage_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        match FsStorage.read(&path) {
            Err(TuneForgeError::NotFound(missing)) => assert_eq!(missing, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn fs_storage_creates_nested_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        FsStorage.ensure_dir(&nested).unwrap();
        let file = nested.join("Settings.json");
        FsStorage.write(&file, b"{}").unwrap();
        assert_eq!(FsStorage.read(&file).unwrap(), b"{}".to_vec());
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        let path = Path::new("Saved/Settings.json");
        assert!(matches!(storage.read(path), Err(TuneForgeError::NotFound(_))));
        storage.write(path, b"{\"Audio\":{}}").unwrap();
        assert!(storage.contains(path));
        assert_eq!(storage.read(path).unwrap(), b"{\"Audio\":{}}".to_vec());
    }
}
