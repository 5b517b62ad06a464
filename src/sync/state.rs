//! Persistent sync state, one record per calendar date.
//!
//! The state file is the only thing that outlives a sync pass: a JSON map
//! from date to the (remote timestamp, content hash) pair last confirmed
//! for that date. It exists to tell a genuinely newer remote edit apart
//! from a remote timestamp that merely drifted relative to what this
//! client already pushed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sync::file::atomic_write;

/// Last confirmed sync point for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// Remote `updated_at` observed at the last successful sync.
    pub remote_updated_at: DateTime<Utc>,
    /// Whole-document hash of the remote content at that point.
    pub content_hash: String,
}

/// File-backed store of [`SyncRecord`]s keyed by date.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    records: BTreeMap<NaiveDate, SyncRecord>,
}

impl StateStore {
    /// Load the state file, degrading to an empty store on any problem.
    ///
    /// A missing file is the normal first-run case. An unreadable or
    /// invalid file is logged and treated as empty rather than failing
    /// the sync: the worst consequence is a conflict prompt that a
    /// healthy state file would have avoided.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let records = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "sync state file invalid, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "sync state file unreadable, starting empty");
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            records,
        }
    }

    /// Last confirmed record for a date, if any.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&SyncRecord> {
        self.records.get(&date)
    }

    /// Persist a new record for a date, overwriting any prior entry.
    ///
    /// The whole file is rewritten atomically so an interrupted write
    /// cannot leave a truncated state file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn set(&mut self, date: NaiveDate, record: SyncRecord) -> Result<()> {
        self.records.insert(date, record);
        let raw = serde_json::to_string_pretty(&self.records)?;
        atomic_write(&self.path, &raw)?;
        Ok(())
    }
}
