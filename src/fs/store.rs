//! Flat string-keyed persistence used by the local cache.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::locking::{read_locked, remove_locked, write_locked};

/// Keyed string storage scoped to one host.
pub trait LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    writes: usize,
}

/// In-memory store. Clones share the same entries, so a test can keep a handle
/// after giving one to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.borrow().entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory.
///
/// File names are the SHA-256 of the key, so any key maps to a safe,
/// fixed-length name.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache directory: {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.root.join(format!("{}.json", hex::encode(digest)))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        read_locked(&self.path_for(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        write_locked(&self.path_for(key), value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        remove_locked(&self.path_for(key))
    }
}
