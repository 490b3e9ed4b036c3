use std::collections::HashMap;
use std::fmt::Write;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::debug;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Corrupt cache entry: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Raw key/value persistence the cache is layered on.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set_item(&self, key: &str, value: String) -> Result<(), CacheError>;

    fn remove_item(&self, key: &str) -> Result<(), CacheError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), CacheError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove_item(key)
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), CacheError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove_item(key)
    }
}

/// Process local storage. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CacheError> {
        self.items
            .lock()
            .map_err(|_| CacheError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.items()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        self.items()?.remove(key);
        Ok(())
    }
}

/// Durable storage keeping one file per key inside `dir`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<FileStorage, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|err| unavailable(&dir, err))?;
        debug!("Using cache directory {}", dir.display());
        Ok(FileStorage { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_name(key)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            // Unreadable bytes are a corrupt entry, not a broken store.
            Err(err) if err.kind() == ErrorKind::InvalidData => Ok(Some(String::new())),
            Err(err) => Err(unavailable(&path, err)),
        }
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), CacheError> {
        let path = self.path(key);
        std::fs::write(&path, value).map_err(|err| unavailable(&path, err))
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path(key);
        match std::fs::remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(unavailable(&path, err)),
            _ => Ok(()),
        }
    }
}

fn unavailable(path: &std::path::Path, err: std::io::Error) -> CacheError {
    CacheError::Unavailable(format!("{}: {}", path.display(), err))
}

/// Longest file name produced, well below the usual 255 byte limit.
const MAX_FILE_NAME: usize = 200;

/// Keeps ASCII alphanumerics, `-` and `.`, escapes everything else as `_xx`.
/// Names that would grow past `MAX_FILE_NAME` become the SHA-256 of the key.
fn file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
            name.push(byte as char);
        } else {
            let _ = write!(name, "_{:02x}", byte);
        }
    }
    if name.len() <= MAX_FILE_NAME {
        return name;
    }
    let mut hashed = String::from("sha256-");
    for byte in Sha256::digest(key.as_bytes()).iter() {
        let _ = write!(hashed, "{:02x}", byte);
    }
    hashed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::default();
        assert!(storage.get_item("k").unwrap().is_none());
        storage.set_item("k", "v".to_string()).unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert!(storage.get_item("k").unwrap().is_none());
    }

    #[test]
    fn file_names_are_distinct_and_safe() {
        let a = file_name("supporters|funding|acme/site|50");
        let b = file_name("supporters|funding|acme_site|50");
        assert_ne!(a, b);
        assert!(!a.contains('/'));
        assert!(!a.contains('|'));
    }

    #[test]
    fn long_keys_get_short_distinct_file_names() {
        let a = file_name(&format!("supporters|funding|{}|50", "a/".repeat(200)));
        let b = file_name(&format!("supporters|funding|{}|100", "a/".repeat(200)));
        assert_ne!(a, b);
        assert!(a.len() <= MAX_FILE_NAME);
        assert!(a.starts_with("sha256-"));
    }

    #[test]
    fn file_storage_keeps_long_keys() {
        let dir = std::env::temp_dir().join(format!("supporters-long-keys-{}", std::process::id()));
        let storage = FileStorage::new(&dir).unwrap();
        let key = format!("supporters|github-repo|{}", "org/".repeat(100));
        storage.set_item(&key, "{}".to_string()).unwrap();
        assert_eq!(storage.get_item(&key).unwrap().as_deref(), Some("{}"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("supporters-storage-{}", std::process::id()));
        let storage = FileStorage::new(&dir).unwrap();
        storage.set_item("a|b", "{}".to_string()).unwrap();
        assert_eq!(storage.get_item("a|b").unwrap().as_deref(), Some("{}"));
        storage.remove_item("a|b").unwrap();
        storage.remove_item("a|b").unwrap();
        assert!(storage.get_item("a|b").unwrap().is_none());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
