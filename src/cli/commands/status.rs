//! Status command implementation.
//!
//! Read-only view of a date's sync state: the local file, the last
//! confirmed sync record, and whether local content still matches what
//! was confirmed. Makes no network calls.

use std::path::PathBuf;

use colored::Colorize;

use crate::config::{self, SyncConfig};
use crate::error::Result;
use crate::sync::{content_hash, read_snapshot, StateStore};

/// Execute the status command.
pub fn execute(date: Option<&str>, journal_dir: Option<&PathBuf>, json: bool) -> Result<()> {
    let date = config::parse_date(date)?;
    let journal_dir = config::resolve_journal_dir(journal_dir.map(PathBuf::as_path))?;
    let sync_config = SyncConfig::new(journal_dir, date);
    let path = sync_config.journal_path();

    let snapshot = read_snapshot(&path)?;
    let state = StateStore::load(&sync_config.state_path);
    let record = state.get(date);

    let local_hash = snapshot.as_ref().map(|s| content_hash(&s.content));
    let matches_record = match (&local_hash, record) {
        (Some(hash), Some(record)) => Some(*hash == record.content_hash),
        _ => None,
    };

    if json {
        let output = serde_json::json!({
            "date": date.to_string(),
            "path": path.display().to_string(),
            "local_exists": snapshot.is_some(),
            "local_modified_at": snapshot.as_ref().map(|s| s.modified_at.to_rfc3339()),
            "last_synced_at": record.map(|r| r.remote_updated_at.to_rfc3339()),
            "matches_last_sync": matches_record,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", format!("Journal status for {date}").bold().underline());
    println!();
    println!("  File: {}", path.display());

    match &snapshot {
        Some(snapshot) => println!("  Modified: {}", snapshot.modified_at.to_rfc3339()),
        None => println!("  {}", "No local entry.".yellow()),
    }

    match record {
        Some(record) => {
            println!("  Last synced: {}", record.remote_updated_at.to_rfc3339());
            match matches_record {
                Some(true) => println!("  {}", "Local matches last confirmed sync.".green()),
                Some(false) => println!("  {}", "Local has unsynced edits.".yellow()),
                None => {}
            }
        }
        None => println!("  {}", "Never synced.".yellow()),
    }

    Ok(())
}
