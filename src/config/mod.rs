//! Configuration resolution.
//!
//! Everything the sync engine needs is resolved here, up front, into an
//! explicit [`SyncConfig`] value. The engine itself never reads process
//! globals (cwd, env vars, "today"): the CLI decides once per invocation
//! and passes the result down, so other front ends and tests can supply
//! their own.
//!
//! # Layout
//!
//! - Journal directory: `--journal-dir` flag / `DAYBOOK_DIR` env, falling
//!   back to `~/.daybook/journal`. One markdown file per date, `YYYY-MM-DD.md`.
//! - Sync state: `.sync-state.json` inside the journal directory.
//! - Remote: `--remote` flag / `DAYBOOK_REMOTE` env; there is no default.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::error::{Error, Result};

/// Name of the state file kept next to the journal entries.
const STATE_FILE: &str = ".sync-state.json";

/// Everything one sync pass needs to know, resolved before the engine runs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory holding one markdown file per date.
    pub journal_dir: PathBuf,
    /// Path of the persisted sync state file.
    pub state_path: PathBuf,
    /// The calendar date being reconciled.
    pub date: NaiveDate,
}

impl SyncConfig {
    /// Build a config for one date within a journal directory.
    #[must_use]
    pub fn new(journal_dir: PathBuf, date: NaiveDate) -> Self {
        let state_path = journal_dir.join(STATE_FILE);
        Self {
            journal_dir,
            state_path,
            date,
        }
    }

    /// Path of the local journal file for the configured date.
    #[must_use]
    pub fn journal_path(&self) -> PathBuf {
        self.journal_dir.join(format!("{}.md", self.date))
    }
}

/// Resolve the journal directory from an explicit flag or the default
/// `~/.daybook/journal` location.
///
/// # Errors
///
/// Returns a config error if no flag was given and the home directory
/// cannot be determined.
pub fn resolve_journal_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    directories::BaseDirs::new()
        .map(|b| b.home_dir().join(".daybook").join("journal"))
        .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))
}

/// Resolve the remote service base URL. There is no baked-in default; a
/// missing value is a config error with a hint.
///
/// # Errors
///
/// Returns a config error if no URL was provided.
pub fn resolve_remote_url(flag: Option<&str>) -> Result<String> {
    flag.map(str::to_string)
        .ok_or_else(|| Error::Config("no remote journal service configured".to_string()))
}

/// Parse an explicit `YYYY-MM-DD` date argument, defaulting to today.
///
/// # Errors
///
/// Returns an error if the argument is present but not a valid date.
pub fn parse_date(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        None => Ok(Local::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| Error::InvalidDate {
            input: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_path_uses_iso_date() {
        let config = SyncConfig::new(PathBuf::from("/tmp/journal"), "2025-06-01".parse().unwrap());
        assert_eq!(
            config.journal_path(),
            PathBuf::from("/tmp/journal/2025-06-01.md")
        );
        assert_eq!(
            config.state_path,
            PathBuf::from("/tmp/journal/.sync-state.json")
        );
    }

    #[test]
    fn test_explicit_journal_dir_wins() {
        let dir = resolve_journal_dir(Some(Path::new("/data/journal"))).unwrap();
        assert_eq!(dir, PathBuf::from("/data/journal"));
    }

    #[test]
    fn test_parse_date_explicit() {
        let date = parse_date(Some("2025-06-01")).unwrap();
        assert_eq!(date, "2025-06-01".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date(Some("June 1st")),
            Err(Error::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_date(Some("2025-13-01")),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_parse_date_defaults_to_today() {
        assert_eq!(parse_date(None).unwrap(), Local::now().date_naive());
    }

    #[test]
    fn test_missing_remote_is_config_error() {
        assert!(matches!(resolve_remote_url(None), Err(Error::Config(_))));
        assert_eq!(
            resolve_remote_url(Some("https://j.example.com")).unwrap(),
            "https://j.example.com"
        );
    }
}
