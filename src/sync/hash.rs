//! Content hashing for sync operations.
//!
//! This module provides SHA256-based content hashing for change detection.
//! Line endings are normalized before hashing so that a file edited on
//! Windows and the same file edited on Linux fingerprint identically.

use sha2::{Digest, Sha256};
use std::borrow::Cow;

/// Normalize line endings: CRLF becomes LF.
///
/// Returns the input unchanged (borrowed) when no CR is present, which is
/// the common case for journals written on Unix.
#[must_use]
pub fn normalize(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Compute a SHA256 hash of normalized text content.
///
/// The digest is the merge-base fingerprint for the whole sync engine:
/// `content_hash(a) == content_hash(b)` exactly when the two texts are
/// identical after line-ending normalization.
#[must_use]
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(text).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check whether two texts are identical after normalization.
#[must_use]
pub fn same_content(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let hash1 = content_hash("## Notes\n- one\n");
        let hash2 = content_hash("## Notes\n- one\n");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA256 produces 64 hex chars
    }

    #[test]
    fn test_hash_ignores_crlf() {
        let unix = "## Notes\n- one\n";
        let windows = "## Notes\r\n- one\r\n";
        assert_eq!(content_hash(unix), content_hash(windows));
    }

    #[test]
    fn test_hash_changes_with_content() {
        let base = "## Notes\n- one\n";
        assert_ne!(content_hash(base), content_hash("## Notes\n- one\nx"));
    }

    #[test]
    fn test_normalize_borrows_when_clean() {
        let text = "no carriage returns here\n";
        assert!(matches!(normalize(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_same_content_across_line_endings() {
        assert!(same_content("a\r\nb", "a\nb"));
        assert!(!same_content("a\nb", "a\nc"));
    }

    #[test]
    fn test_empty_text_hashes() {
        assert_eq!(content_hash(""), content_hash("\r\n".trim_end()));
    }
}
