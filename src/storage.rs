//! Storage abstraction for uploads and generated sites.
//!
//! The generator and the asset processor never touch `std::fs` directly.
//! They receive a [`Storage`] and address content with `/`-separated keys
//! relative to its root:
//!
//! ```text
//! uploads:  joe_s_caf___logo_logo.png
//! sites:    joe_s_caf__/index.html
//!           joe_s_caf__/assets/style.css
//!           joe_s_caf__/images/product_0.jpg
//! ```
//!
//! Two implementations ship:
//!
//! - [`FsStorage`]: rooted at a directory; writes create parent directories
//!   as needed and replace existing files in place.
//! - [`MemoryStorage`]: a map behind a lock, for tests and dry runs.
//!
//! Every key goes through [`normalize_key`] first, so no implementation can
//! be asked to read or write outside its root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Key/value view over a directory tree.
pub trait Storage: Send + Sync {
    /// Read the full contents stored under `key`.
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Store `bytes` under `key`, replacing anything already there.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// All keys below `prefix`, sorted. An empty prefix lists everything.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Whether a value is stored under `key`. Invalid keys never exist.
    fn exists(&self, key: &str) -> bool;
}

/// Normalize a relative key.
///
/// Backslashes are treated as separators, empty and `.` segments are dropped.
/// Absolute keys, drive prefixes and `..` segments are rejected rather than
/// resolved.
///
/// ```text
/// "a//b/./c.html"  → "a/b/c.html"
/// "../secret"      → InvalidKey
/// "/etc/passwd"    → InvalidKey
/// ```
pub fn normalize_key(key: &str) -> Result<String, StorageError> {
    let unified = key.replace('\\', "/");
    if unified.starts_with('/') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(StorageError::InvalidKey(key.to_string())),
            s if s.contains(':') || s.contains('\0') => {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(segments.join("/"))
}

/// Normalize a listing prefix. Unlike keys, an empty prefix is allowed.
fn normalize_prefix(prefix: &str) -> Result<String, StorageError> {
    if prefix.trim_matches(['/', '\\', '.']).is_empty() && !prefix.contains("..") {
        return Ok(String::new());
    }
    let key = normalize_key(prefix)?;
    Ok(format!("{key}/"))
}

// ============================================================================
// Filesystem
// ============================================================================

/// Storage rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a key, after normalization.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let key = normalize_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |p, s| p.join(s)))
    }
}

impl Storage for FsStorage {
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(fs::read(path)?)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = normalize_prefix(prefix)?;
        let start = prefix
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |p, s| p.join(s));
        if !start.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&start).follow_links(false) {
            let entry = entry.map_err(|e| {
                StorageError::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other("filesystem loop while listing storage")
                }))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            keys.push(key);
        }
        keys.sort();
        Ok(keys)
    }

    fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Storage kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::Io(std::io::Error::other("memory storage lock poisoned"))
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let key = normalize_key(key)?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        entries
            .get(&key)
            .cloned()
            .ok_or(StorageError::NotFound(key))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let key = normalize_key(key)?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key, bytes.to_vec());
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = normalize_prefix(prefix)?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn exists(&self, key: &str) -> bool {
        let Ok(key) = normalize_key(key) else {
            return false;
        };
        self.entries
            .read()
            .map(|e| e.contains_key(&key))
            .unwrap_or(false)
    }
}
