//! The sync orchestrator.
//!
//! One invocation performs one reconciliation pass for one date: read the
//! local snapshot, fetch the remote entry, consult the persisted sync
//! record, and decide whether to push, pull, merge, or only align
//! timestamps. Every successful path makes at most one network write and
//! updates the sync record exactly once; every failure path aborts before
//! the record update and leaves the local file untouched, so re-running
//! always starts from a consistent comparison point.
//!
//! Decision order for a date with both a local file and a remote entry
//! (`local_time` = file mtime, `remote_time` = remote `updated_at`):
//!
//! 1. `remote_time <= local_time` → push; local is authoritative.
//! 2. Remote is newer but matches the persisted record (timestamp or
//!    hash) → nothing actually changed remotely; this is clock skew.
//!    Push local edits if any, otherwise the sides are already in sync.
//! 3. Remote is newer and unknown, but content is identical after
//!    normalization → align the local mtime to `remote_time`; no network
//!    write.
//! 4. Remote is newer, unknown, and content differs → section merge.
//!    Clean merges are written locally and pushed; conflicts go to the
//!    [`ConflictResolver`] for a keep-local / take-remote decision.

use std::path::Path;

use serde::Serialize;

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::remote::{RemoteEntry, RemoteStore};
use crate::sync::file::{self, LocalSnapshot};
use crate::sync::hash::{content_hash, normalize, same_content};
use crate::sync::merge::merge_sections;
use crate::sync::sections::{parse_sections, reconstruct};
use crate::sync::state::{StateStore, SyncRecord};

/// The binary decision a resolver returns for a conflicted merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep the local content unchanged and push it.
    KeepLocal,
    /// Replace local content with the remote entry verbatim.
    TakeRemote,
}

/// Pluggable conflict resolution.
///
/// The default CLI binds this to a terminal prompt (showing a diff
/// first); tests and other front ends supply their own. Whatever the
/// source, local edits stay on disk untouched until a decision is made.
pub trait ConflictResolver {
    /// Decide how to resolve a conflicted merge.
    ///
    /// # Errors
    ///
    /// Returns an error if no decision can be obtained (for example, the
    /// terminal prompt fails to read input).
    fn resolve(
        &self,
        local_path: &Path,
        remote_content: &str,
        conflicts: &[String],
    ) -> Result<Decision>;
}

/// What a completed sync pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Local and remote were already identical; nothing written anywhere.
    UpToDate,
    /// Local content was pushed to the remote.
    Pushed,
    /// Remote content replaced the local file; no push.
    Pulled,
    /// Both sides' sections were merged, written locally, and pushed.
    Merged,
    /// Content was identical; only the local mtime was aligned.
    TimestampsAligned,
}

/// One-shot sync pass over a [`RemoteStore`] and a [`ConflictResolver`].
pub struct SyncEngine<'a, R, C> {
    config: &'a SyncConfig,
    remote: &'a R,
    resolver: &'a C,
}

impl<'a, R: RemoteStore, C: ConflictResolver> SyncEngine<'a, R, C> {
    pub fn new(config: &'a SyncConfig, remote: &'a R, resolver: &'a C) -> Self {
        Self {
            config,
            remote,
            resolver,
        }
    }

    /// Run the reconciliation pass.
    ///
    /// # Errors
    ///
    /// Propagates connectivity, authentication, server, and filesystem
    /// failures. All of them abort before the sync record update.
    pub async fn run(&self) -> Result<SyncOutcome> {
        let date = self.config.date;
        let path = self.config.journal_path();
        let mut state = StateStore::load(&self.config.state_path);

        let local = file::read_snapshot(&path)?;
        let remote = self.remote.fetch(date).await?;

        match (local, remote) {
            (None, None) => Err(Error::Other(format!(
                "no journal entry for {date} locally or remotely; create {} first",
                path.display()
            ))),
            (Some(local), None) => {
                tracing::debug!(%date, "no remote entry, pushing local content");
                self.push(&mut state, &local.content).await?;
                Ok(SyncOutcome::Pushed)
            }
            (None, Some(entry)) => {
                tracing::debug!(%date, "no local file, adopting remote entry");
                self.pull(&mut state, &path, &entry)?;
                Ok(SyncOutcome::Pulled)
            }
            (Some(local), Some(entry)) => self.reconcile(&mut state, &path, &local, &entry).await,
        }
    }

    async fn reconcile(
        &self,
        state: &mut StateStore,
        path: &Path,
        local: &LocalSnapshot,
        entry: &RemoteEntry,
    ) -> Result<SyncOutcome> {
        let date = self.config.date;
        let local_time = local.modified_at;
        let remote_time = entry.updated_at;
        let local_hash = content_hash(&local.content);
        let remote_hash = content_hash(&entry.content);
        let record = state.get(date).cloned();

        if remote_time <= local_time {
            if remote_time == local_time && local_hash == remote_hash {
                tracing::debug!(%date, "timestamps and content already agree");
                return Ok(SyncOutcome::UpToDate);
            }
            tracing::debug!(%date, "local is newer, pushing");
            self.push(state, &local.content).await?;
            return Ok(SyncOutcome::Pushed);
        }

        // Remote reports newer. If it still matches what we confirmed at
        // the last sync, the remote has not really changed; trusting the
        // raw timestamp here would pull forever on a skewed clock.
        let known_record = record
            .as_ref()
            .filter(|r| r.remote_updated_at == remote_time || r.content_hash == remote_hash);
        if let Some(record) = known_record {
            if record.content_hash == local_hash {
                tracing::debug!(%date, "remote timestamp drift only, nothing to sync");
                return Ok(SyncOutcome::UpToDate);
            }
            tracing::debug!(%date, "clock skew detected, pushing local edits");
            self.push(state, &local.content).await?;
            return Ok(SyncOutcome::Pushed);
        }

        if same_content(&local.content, &entry.content) {
            tracing::debug!(%date, "content identical, aligning local mtime");
            file::set_modified_time(path, remote_time)?;
            state.set(
                date,
                SyncRecord {
                    remote_updated_at: remote_time,
                    content_hash: remote_hash,
                },
            )?;
            return Ok(SyncOutcome::TimestampsAligned);
        }

        // Genuine divergence: merge section by section.
        let local_sections = parse_sections(&normalize(&local.content));
        let remote_sections = parse_sections(&normalize(&entry.content));
        let known_hash = record.as_ref().map(|r| r.content_hash.as_str());
        let outcome = merge_sections(&local_sections, &remote_sections, known_hash, &remote_hash);

        if outcome.is_clean() {
            let merged = reconstruct(&outcome.merged);
            tracing::info!(%date, "auto-merged local and remote edits");
            file::atomic_write(path, &merged)?;
            self.push(state, &merged).await?;
            return Ok(SyncOutcome::Merged);
        }

        tracing::info!(%date, conflicts = ?outcome.conflicts, "merge conflicts, asking for resolution");
        match self
            .resolver
            .resolve(path, &entry.content, &outcome.conflicts)?
        {
            Decision::TakeRemote => {
                self.pull(state, path, entry)?;
                Ok(SyncOutcome::Pulled)
            }
            Decision::KeepLocal => {
                self.push(state, &local.content).await?;
                Ok(SyncOutcome::Pushed)
            }
        }
    }

    /// Push content to the remote and record the confirmed sync point.
    async fn push(&self, state: &mut StateStore, content: &str) -> Result<()> {
        let pushed = self.remote.store(self.config.date, content).await?;
        state.set(
            self.config.date,
            SyncRecord {
                remote_updated_at: pushed.updated_at,
                content_hash: content_hash(content),
            },
        )
    }

    /// Replace local content with the remote entry verbatim and align the
    /// local mtime so the next pass compares cleanly.
    fn pull(&self, state: &mut StateStore, path: &Path, entry: &RemoteEntry) -> Result<()> {
        file::atomic_write(path, &entry.content)?;
        file::set_modified_time(path, entry.updated_at)?;
        state.set(
            self.config.date,
            SyncRecord {
                remote_updated_at: entry.updated_at,
                content_hash: content_hash(&entry.content),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory remote store with failure injection and a write counter.
    struct FakeRemote {
        entry: Mutex<Option<RemoteEntry>>,
        stores: Mutex<usize>,
        fail_fetch: Option<fn() -> Error>,
    }

    impl FakeRemote {
        fn empty() -> Self {
            Self {
                entry: Mutex::new(None),
                stores: Mutex::new(0),
                fail_fetch: None,
            }
        }

        fn with_entry(content: &str, updated_at: DateTime<Utc>) -> Self {
            Self {
                entry: Mutex::new(Some(RemoteEntry {
                    content: content.to_string(),
                    updated_at,
                })),
                stores: Mutex::new(0),
                fail_fetch: None,
            }
        }

        fn failing(make_error: fn() -> Error) -> Self {
            Self {
                entry: Mutex::new(None),
                stores: Mutex::new(0),
                fail_fetch: Some(make_error),
            }
        }

        fn store_count(&self) -> usize {
            *self.stores.lock().unwrap()
        }

        fn content(&self) -> String {
            self.entry.lock().unwrap().as_ref().unwrap().content.clone()
        }
    }

    impl RemoteStore for FakeRemote {
        async fn fetch(&self, _date: NaiveDate) -> Result<Option<RemoteEntry>> {
            if let Some(make_error) = self.fail_fetch {
                return Err(make_error());
            }
            Ok(self.entry.lock().unwrap().clone())
        }

        async fn store(&self, _date: NaiveDate, content: &str) -> Result<RemoteEntry> {
            *self.stores.lock().unwrap() += 1;
            let entry = RemoteEntry {
                content: content.to_string(),
                updated_at: Utc::now(),
            };
            *self.entry.lock().unwrap() = Some(entry.clone());
            Ok(entry)
        }
    }

    /// Resolver returning a fixed decision.
    struct Always(Decision);

    impl ConflictResolver for Always {
        fn resolve(&self, _: &Path, _: &str, _: &[String]) -> Result<Decision> {
            Ok(self.0)
        }
    }

    /// Resolver that must never be consulted.
    struct NoPrompt;

    impl ConflictResolver for NoPrompt {
        fn resolve(&self, _: &Path, _: &str, conflicts: &[String]) -> Result<Decision> {
            panic!("unexpected conflict prompt for {conflicts:?}");
        }
    }

    struct Fixture {
        _dir: TempDir,
        config: SyncConfig,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let config = SyncConfig::new(dir.path().to_path_buf(), "2025-06-01".parse().unwrap());
        Fixture { _dir: dir, config }
    }

    fn write_local(config: &SyncConfig, content: &str, mtime: DateTime<Utc>) {
        file::atomic_write(&config.journal_path(), content).unwrap();
        file::set_modified_time(&config.journal_path(), mtime).unwrap();
    }

    fn seed_record(config: &SyncConfig, content: &str, remote_time: DateTime<Utc>) {
        let mut state = StateStore::load(&config.state_path);
        state
            .set(
                config.date,
                SyncRecord {
                    remote_updated_at: remote_time,
                    content_hash: content_hash(content),
                },
            )
            .unwrap();
    }

    fn local_content(config: &SyncConfig) -> String {
        std::fs::read_to_string(config.journal_path()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[tokio::test]
    async fn test_push_when_no_remote_entry() {
        let fx = fixture();
        let local = "## Inbox\n- item A\n";
        write_local(&fx.config, local, now());
        let remote = FakeRemote::empty();

        let outcome = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Pushed);
        assert_eq!(remote.store_count(), 1);
        assert_eq!(remote.content(), local);

        let state = StateStore::load(&fx.config.state_path);
        let record = state.get(fx.config.date).unwrap();
        assert_eq!(record.content_hash, content_hash(local));
    }

    #[tokio::test]
    async fn test_push_when_local_is_newer() {
        let fx = fixture();
        let remote_time = now() - Duration::hours(2);
        let remote = FakeRemote::with_entry("## Notes\n- old remote\n", remote_time);
        write_local(&fx.config, "## Notes\n- newer local\n", now());

        let outcome = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Pushed);
        assert_eq!(remote.content(), "## Notes\n- newer local\n");
    }

    #[tokio::test]
    async fn test_identical_content_aligns_timestamps_without_network_write() {
        let fx = fixture();
        let content = "## Notes\n- same everywhere\n";
        let remote_time = now();
        let local_time = remote_time - Duration::hours(1);
        write_local(&fx.config, content, local_time);
        // Remote has CRLF endings; still identical after normalization.
        let remote = FakeRemote::with_entry(&content.replace('\n', "\r\n"), remote_time);

        let outcome = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::TimestampsAligned);
        assert_eq!(remote.store_count(), 0);

        let snapshot = file::read_snapshot(&fx.config.journal_path())
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.modified_at, remote_time);
        assert_eq!(snapshot.content, content);

        let state = StateStore::load(&fx.config.state_path);
        assert!(state.get(fx.config.date).is_some());
    }

    #[tokio::test]
    async fn test_disjoint_section_additions_auto_merge() {
        let fx = fixture();
        let base = "# Monday\n";
        let remote_time = now();
        let local_time = remote_time - Duration::minutes(5);

        seed_record(&fx.config, base, remote_time - Duration::hours(1));
        write_local(&fx.config, "# Monday\n## Notes\n- local line\n", local_time);
        let remote = FakeRemote::with_entry("# Monday\n## Backlog\n- remote line\n", remote_time);

        let outcome = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Merged);
        assert_eq!(remote.store_count(), 1);

        let merged = local_content(&fx.config);
        assert!(merged.contains("- local line"));
        assert!(merged.contains("- remote line"));
        // Canonical order puts Backlog before Notes.
        assert_eq!(merged, "# Monday\n## Backlog\n- remote line\n## Notes\n- local line\n");
        assert_eq!(remote.content(), merged);
    }

    #[tokio::test]
    async fn test_conflict_keep_local_pushes_unchanged() {
        let fx = fixture();
        let remote_time = now();
        let local = "## Completed ✅\n- local version\n";
        seed_record(&fx.config, "## Completed ✅\n- base\n", remote_time - Duration::hours(1));
        write_local(&fx.config, local, remote_time - Duration::minutes(5));
        let remote = FakeRemote::with_entry("## Completed ✅\n- remote version\n", remote_time);

        let outcome = SyncEngine::new(&fx.config, &remote, &Always(Decision::KeepLocal))
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Pushed);
        assert_eq!(local_content(&fx.config), local);
        assert_eq!(remote.content(), local);
    }

    #[tokio::test]
    async fn test_conflict_take_remote_replaces_local() {
        let fx = fixture();
        let remote_time = now();
        let remote_content = "## Completed ✅\n- remote version\n";
        seed_record(&fx.config, "## Completed ✅\n- base\n", remote_time - Duration::hours(1));
        write_local(
            &fx.config,
            "## Completed ✅\n- local version\n",
            remote_time - Duration::minutes(5),
        );
        let remote = FakeRemote::with_entry(remote_content, remote_time);

        let outcome = SyncEngine::new(&fx.config, &remote, &Always(Decision::TakeRemote))
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Pulled);
        assert_eq!(remote.store_count(), 0);
        assert_eq!(local_content(&fx.config), remote_content);

        let snapshot = file::read_snapshot(&fx.config.journal_path())
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.modified_at, remote_time);
    }

    #[tokio::test]
    async fn test_conflict_names_reported() {
        let fx = fixture();
        let remote_time = now();
        seed_record(&fx.config, "base", remote_time - Duration::hours(1));
        write_local(
            &fx.config,
            "## Completed ✅\n- local\n",
            remote_time - Duration::minutes(5),
        );
        let remote = FakeRemote::with_entry("## Completed ✅\n- remote\n", remote_time);

        struct Capture(Mutex<Vec<String>>);
        impl ConflictResolver for Capture {
            fn resolve(&self, _: &Path, _: &str, conflicts: &[String]) -> Result<Decision> {
                *self.0.lock().unwrap() = conflicts.to_vec();
                Ok(Decision::KeepLocal)
            }
        }

        let capture = Capture(Mutex::new(Vec::new()));
        SyncEngine::new(&fx.config, &remote, &capture)
            .run()
            .await
            .unwrap();

        assert_eq!(*capture.0.lock().unwrap(), ["Completed ✅"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_any_write() {
        let fx = fixture();
        let local = "## Notes\n- precious\n";
        write_local(&fx.config, local, now());
        let remote = FakeRemote::failing(|| Error::Connectivity("network down".into()));

        let err = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Connectivity(_)));
        assert_eq!(remote.store_count(), 0);
        assert_eq!(local_content(&fx.config), local);
        let state = StateStore::load(&fx.config.state_path);
        assert!(state.get(fx.config.date).is_none());
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let fx = fixture();
        write_local(&fx.config, "## Inbox\n- item\n", now());
        let remote = FakeRemote::empty();

        let first = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap();
        assert_eq!(first, SyncOutcome::Pushed);
        assert_eq!(remote.store_count(), 1);

        let second = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap();
        assert_eq!(second, SyncOutcome::UpToDate);
        assert_eq!(remote.store_count(), 1, "second run must not write");
    }

    #[tokio::test]
    async fn test_clock_skew_pushes_instead_of_prompting() {
        let fx = fixture();
        let base = "## Notes\n- base\n";
        let remote_time = now();
        // Remote matches the persisted record exactly, but its timestamp
        // is ahead of the local mtime: skew, not a real remote edit.
        seed_record(&fx.config, base, remote_time);
        write_local(
            &fx.config,
            "## Notes\n- base\n- local addition\n",
            remote_time - Duration::hours(3),
        );
        let remote = FakeRemote::with_entry(base, remote_time);

        let outcome = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Pushed);
        assert_eq!(remote.content(), "## Notes\n- base\n- local addition\n");
    }

    #[tokio::test]
    async fn test_missing_local_pulls_remote() {
        let fx = fixture();
        let remote_time = now();
        let remote = FakeRemote::with_entry("## Notes\n- from remote\n", remote_time);

        let outcome = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Pulled);
        assert_eq!(local_content(&fx.config), "## Notes\n- from remote\n");
        assert_eq!(remote.store_count(), 0);
    }

    #[tokio::test]
    async fn test_nothing_to_sync_is_an_error() {
        let fx = fixture();
        let remote = FakeRemote::empty();

        let err = SyncEngine::new(&fx.config, &remote, &NoPrompt)
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("2025-06-01"));
    }
}
