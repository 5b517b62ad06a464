//! The journal sync engine.
//!
//! Reconciles the local markdown file for a date against the remote
//! journal service in a single pass:
//!
//! - **Hashing**: line-ending-normalized SHA256 fingerprints for change
//!   detection and the merge base
//! - **Sections**: parsing a document into heading-keyed blocks and
//!   reconstructing canonical text
//! - **Merge**: three-way section merge using the last confirmed remote
//!   hash as the base, with conflict detection
//! - **State**: the per-date (timestamp, hash) records that survive
//!   between runs
//! - **Engine**: the push/pull/merge/align decision machine
//!
//! # Example
//!
//! ```ignore
//! use daybook::config::SyncConfig;
//! use daybook::remote::HttpRemote;
//! use daybook::sync::SyncEngine;
//!
//! let config = SyncConfig::new(journal_dir, date);
//! let remote = HttpRemote::new(&url, token)?;
//! let outcome = SyncEngine::new(&config, &remote, &resolver).run().await?;
//! ```

mod diff;
mod engine;
mod file;
mod hash;
mod merge;
mod sections;
mod state;

pub use diff::show_diff;
pub use engine::{ConflictResolver, Decision, SyncEngine, SyncOutcome};
pub use file::{atomic_write, read_snapshot, set_modified_time, LocalSnapshot};
pub use hash::{content_hash, normalize, same_content};
pub use merge::{merge_sections, MergeOutcome};
pub use sections::{parse_sections, reconstruct, SectionMap, HEADER_KEY};
pub use state::{StateStore, SyncRecord};
