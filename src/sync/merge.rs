//! Three-way section merge with conflict detection.
//!
//! The merge base is not a full document snapshot: all this client keeps
//! from the last confirmed sync is the whole-document hash of the remote
//! content (see [`crate::sync::state`]). That single fingerprint is enough
//! to tell the two interesting cases apart when a section differs on both
//! sides:
//!
//! - remote hash still matches the recorded hash → the remote side has not
//!   changed since we last synced, so the difference must be local edits
//!   alone. Local wins, no conflict.
//! - remote hash differs → both sides changed independently. That is a
//!   genuine conflict; the local value is kept as the merged default so
//!   local edits are never silently discarded.

use crate::sync::sections::SectionMap;

/// Result of merging two section maps.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Merged sections, containing every name present in either input.
    pub merged: SectionMap,
    /// Names of sections modified independently on both sides.
    pub conflicts: Vec<String>,
}

impl MergeOutcome {
    /// True when the merge resolved cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Merge local and remote section maps.
///
/// `known_remote_hash` is the whole-document content hash recorded at the
/// last confirmed sync (if any); `remote_hash` is the hash of the remote
/// content as fetched this pass. Sections present on only one side are
/// kept as-is; sections differing on both sides conflict unless the remote
/// document is unchanged since the last sync.
#[must_use]
pub fn merge_sections(
    local: &SectionMap,
    remote: &SectionMap,
    known_remote_hash: Option<&str>,
    remote_hash: &str,
) -> MergeOutcome {
    let remote_unchanged = known_remote_hash == Some(remote_hash);

    let mut merged = SectionMap::new();
    let mut conflicts = Vec::new();

    for (name, local_body) in local {
        match remote.get(name) {
            None => {
                // Local wins when remote lacks the section.
                merged.insert(name.clone(), local_body.clone());
            }
            Some(remote_body) if remote_body == local_body => {
                merged.insert(name.clone(), local_body.clone());
            }
            Some(_) if remote_unchanged => {
                // Remote document is what we last synced; the difference is
                // attributable to local edits alone.
                merged.insert(name.clone(), local_body.clone());
            }
            Some(_) => {
                conflicts.push(name.clone());
                merged.insert(name.clone(), local_body.clone());
            }
        }
    }

    // Sections newly added remotely.
    for (name, remote_body) in remote {
        if !merged.contains_key(name) {
            merged.insert(name.clone(), remote_body.clone());
        }
    }

    MergeOutcome { merged, conflicts }
}
