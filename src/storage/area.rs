use crate::errors::CacheError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A named slot store holding one JSON string per key: the capability the
/// persistence adapter writes through. Implementations decide where slots
/// live and how long they survive.
pub trait StorageArea: Send + Sync {
    /// Reads a slot. `Ok(None)` means the slot was never written.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
    /// Removes a slot. Removing an absent slot is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Persistent storage area: one file per slot under `dir`, surviving
/// process restarts.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens a storage area rooted at `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens a storage area under the platform cache directory, namespaced
    /// by `namespace`. Falls back to the OS temp dir on platforms without
    /// a cache directory.
    pub fn in_cache_dir(namespace: &str) -> Result<Self, CacheError> {
        let base = dirs_next::cache_dir().unwrap_or_else(std::env::temp_dir);
        Self::new(base.join(namespace))
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(slot_file_name(key))
    }
}

impl StorageArea for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        read_slot(&self.slot_path(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        write_slot(&self.slot_path(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        remove_slot(&self.slot_path(key))
    }
}

/// Session-scoped storage area: slots live in a temp directory that is
/// removed when the area is dropped.
pub struct SessionStorage {
    dir: tempfile::TempDir,
}

impl SessionStorage {
    pub fn new() -> Result<Self, CacheError> {
        let dir = tempfile::Builder::new().prefix("stashlite-session-").tempdir()?;
        Ok(Self { dir })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.path().join(slot_file_name(key))
    }
}

impl StorageArea for SessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        read_slot(&self.slot_path(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        write_slot(&self.slot_path(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        remove_slot(&self.slot_path(key))
    }
}

/// Maps a slot key to a file name: a sanitized stem plus a crc32 of the
/// original key, so distinct keys cannot collide after sanitization.
fn slot_file_name(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    format!("{stem}-{:08x}.json", crc32fast::hash(key.as_bytes()))
}

fn read_slot(path: &Path) -> Result<Option<String>, CacheError> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes through a temp file in the same directory, then renames over the
/// live slot, so a reader never observes a half-written slot.
fn write_slot(path: &Path, value: &str) -> Result<(), CacheError> {
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = create_secure(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn remove_slot(path: &Path) -> Result<(), CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Create a file with restrictive permissions where supported.
///
/// On Unix, this maps to 0o600. On Windows, the default inherits ACLs; we just avoid world-writable flags.
fn create_secure(path: &Path) -> io::Result<File> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)
    }
    #[cfg(not(unix))]
    {
        OpenOptions::new().write(true).create(true).truncate(true).open(path)
    }
}
