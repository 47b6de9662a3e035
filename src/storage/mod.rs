//! Blob storage for persisted gateway state.
//!
//! # Responsibilities
//! - Answer whether a named blob exists
//! - Read and write whole blobs by key
//!
//! # Design Decisions
//! - Keys are plain file names; nested paths and `..` are rejected
//! - Reads and writes are synchronous: they only happen at startup or from tooling
//! - The in-memory store is concurrent so tests and embedders can share it

use dashmap::DashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    #[error("blob `{0}` not found")]
    NotFound(String),

    #[error("IO error on `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Key-value blob store contract required by route persistence.
pub trait BlobStore: Send + Sync {
    fn exists(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Returns true if `key` names a single file (no separators, not `.` or `..`).
pub fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\'])
        && !key.contains('\0')
}

/// Blob store backed by files in a single directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_plain_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl BlobStore for FsBlobStore {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::Io {
                key: key.to_string(),
                source,
            },
        })
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source: io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.root).map_err(io_err)?;

        // Write beside the target and rename so readers never see a partial blob.
        let staging = self.root.join(format!(".{}.tmp", key));
        fs::write(&staging, bytes).map_err(io_err)?;
        fs::rename(&staging, &path).map_err(io_err)?;

        tracing::debug!(key = %key, bytes = bytes.len(), root = ?self.root, "Blob written");
        Ok(())
    }
}

/// Blob store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    inner: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn exists(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.inner
            .get(key)
            .map(|r| r.value().clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if !is_plain_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        self.inner.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keys() {
        assert!(is_plain_key("routes.json"));
        assert!(!is_plain_key(""));
        assert!(!is_plain_key(".."));
        assert!(!is_plain_key("a/b.json"));
        assert!(!is_plain_key("..\\b.json"));
    }

    #[test]
    fn test_fs_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("nested"));

        assert!(!store.exists("routes.json"));
        store.put("routes.json", b"[]").unwrap();
        assert!(store.exists("routes.json"));
        assert_eq!(store.get("routes.json").unwrap(), b"[]");
    }

    #[test]
    fn test_fs_store_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        assert!(matches!(store.get("absent.json"), Err(StorageError::NotFound(_))));
        assert!(matches!(store.get("../etc"), Err(StorageError::InvalidKey(_))));
        assert!(!store.exists("../etc"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryBlobStore::new();
        assert!(store.is_empty());

        store.put("routes.json", b"{}").unwrap();
        let shared = store.clone();
        assert!(shared.exists("routes.json"));
        assert_eq!(shared.get("routes.json").unwrap(), b"{}");
        assert!(matches!(store.put("a/b", b""), Err(StorageError::InvalidKey(_))));
    }
}
