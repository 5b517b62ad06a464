//! Local journal file operations.
//!
//! This module provides safe file operations that prevent data corruption:
//! - Atomic writes: write to temp file, sync to disk, then rename
//! - Snapshot reads pairing content with the file's modification time
//! - Modification-time alignment for timestamp-only reconciliation

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Local journal content paired with its filesystem modification time.
///
/// Read fresh at the start of every sync pass and discarded afterwards.
#[derive(Debug, Clone)]
pub struct LocalSnapshot {
    /// Full file content.
    pub content: String,
    /// Filesystem mtime, compared against the remote `updated_at`.
    pub modified_at: DateTime<Utc>,
}

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file (same path with `.tmp` extension)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write to temp file
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        // Sync to disk before rename
        writer.get_ref().sync_all()?;
    }

    // Atomic rename
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read the journal file for a date, if it exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, or its
/// metadata is unavailable.
pub fn read_snapshot(path: &Path) -> Result<Option<LocalSnapshot>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let modified_at = fs::metadata(path)?.modified()?.into();

    Ok(Some(LocalSnapshot {
        content,
        modified_at,
    }))
}

/// Align a file's modification time to a remote timestamp.
///
/// Used when local and remote content are identical and only the clocks
/// disagree: touching the mtime makes the next comparison a no-op without
/// any network write.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its mtime set.
pub fn set_modified_time(path: &Path, time: DateTime<Utc>) -> Result<()> {
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_modified(time.into())?;
    Ok(())
}
