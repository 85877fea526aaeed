//! Advisory-locked access to cache files.
//!
//! Two wizard sessions for the same competition may share a cache directory.
//! Their writes are not reconciled (last writer wins), but the `fs2` locks keep
//! a reader from ever seeing a half-written snapshot.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

/// Read a file under a shared lock. A missing file is `Ok(None)`.
pub fn read_locked(path: &Path) -> Result<Option<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open cache file: {}", path.display()))
        }
    };

    file.lock_shared()
        .with_context(|| format!("Failed to acquire shared lock: {}", path.display()))?;
    let mut content = String::new();
    BufReader::new(&file)
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
    Ok(Some(content))
}

/// Replace a file's contents under an exclusive lock.
///
/// The file is truncated only after the lock is held, so a concurrent reader
/// never observes an empty file.
pub fn write_locked(path: &Path, content: &str) -> Result<()> {
    #[allow(clippy::suspicious_open_options)]
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open cache file for writing: {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("Failed to acquire exclusive lock: {}", path.display()))?;
    file.set_len(0)
        .with_context(|| format!("Failed to truncate cache file: {}", path.display()))?;

    let mut writer = BufWriter::new(&file);
    writer
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write cache file: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush cache file: {}", path.display()))?;
    Ok(())
}

/// Delete a file under an exclusive lock. A missing file is not an error.
pub fn remove_locked(path: &Path) -> Result<()> {
    let file = match OpenOptions::new().write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open cache file: {}", path.display()))
        }
    };
    file.lock_exclusive()
        .with_context(|| format!("Failed to acquire exclusive lock: {}", path.display()))?;

    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove cache file: {}", path.display())),
    }
}
