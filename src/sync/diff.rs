//! Human-readable diff presentation for merge conflicts.
//!
//! The remote content is materialized to a temporary file and handed to an
//! external unified-diff tool so the user sees the divergence before being
//! asked to resolve it. The temp file is owned by a `NamedTempFile` and
//! removed on every exit path, including tool failure.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use colored::Colorize;

use crate::error::Result;

/// Candidate diff tools, tried in order. `diff` and `git diff --no-index`
/// both exit 1 when the inputs differ, which is the expected case here.
const DIFF_TOOLS: [(&str, &[&str]); 2] = [
    ("diff", &["-u"]),
    ("git", &["diff", "--no-index", "--color=always"]),
];

/// Print a unified diff between the local file and the remote content.
///
/// Falls back to a neutral notice when no diff tool is available; conflict
/// resolution proceeds either way, so this never fails the sync.
///
/// # Errors
///
/// Returns an error only if the remote content cannot be written to a
/// temporary file.
pub fn show_diff(local_path: &Path, remote_content: &str) -> Result<()> {
    let mut remote_file = tempfile::Builder::new().suffix(".md").tempfile()?;
    remote_file.write_all(remote_content.as_bytes())?;
    remote_file.flush()?;

    println!(
        "{} {} (local) vs remote",
        "Conflicting changes:".yellow().bold(),
        local_path.display()
    );

    for (tool, args) in DIFF_TOOLS {
        let output = Command::new(tool)
            .args(args)
            .arg(local_path)
            .arg(remote_file.path())
            .output();

        match output {
            // Exit 0 = identical, 1 = differences found; both are success.
            Ok(out) if out.status.code().is_some_and(|c| c <= 1) => {
                print!("{}", String::from_utf8_lossy(&out.stdout));
                return Ok(());
            }
            Ok(_) | Err(_) => {
                tracing::debug!(tool, "diff tool unavailable or failed, trying next");
            }
        }
    }

    println!("(no diff tool available; compare the files manually)");
    Ok(())
}
