//! Sync command implementation.
//!
//! Resolves configuration and credentials, runs one reconciliation pass,
//! and reports the outcome. Conflict resolution defaults to a terminal
//! prompt (with a diff shown first) but can be pre-bound with `--resolve`
//! for scripted use.

use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::cli::ResolveChoice;
use crate::config::{self, SyncConfig};
use crate::error::{Error, Result};
use crate::remote::{CredentialProvider, DefaultCredentials, HttpRemote};
use crate::sync::{show_diff, ConflictResolver, Decision, SyncEngine, SyncOutcome};

/// Execute the sync command.
pub fn execute(
    date: Option<&str>,
    remote_url: Option<&str>,
    resolve: Option<ResolveChoice>,
    journal_dir: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let date = config::parse_date(date)?;
    let journal_dir = config::resolve_journal_dir(journal_dir.map(PathBuf::as_path))?;
    let remote_url = config::resolve_remote_url(remote_url)?;
    let sync_config = SyncConfig::new(journal_dir, date);

    let token = DefaultCredentials::new().bearer_token()?;
    let remote = HttpRemote::new(&remote_url, token)?;
    let resolver = CliResolver::new(resolve);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    let outcome = rt.block_on(SyncEngine::new(&sync_config, &remote, &resolver).run())?;

    report(&sync_config, outcome, json)
}

fn report(config: &SyncConfig, outcome: SyncOutcome, json: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "success": true,
            "date": config.date.to_string(),
            "path": config.journal_path().display().to_string(),
            "outcome": outcome,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let date = config.date;
    match outcome {
        SyncOutcome::UpToDate => println!("{date}: already in sync."),
        SyncOutcome::Pushed => println!("{date}: {} local content to remote.", "pushed".green()),
        SyncOutcome::Pulled => println!("{date}: {} remote content over local.", "pulled".yellow()),
        SyncOutcome::Merged => println!("{date}: {} both sides and pushed.", "merged".green()),
        SyncOutcome::TimestampsAligned => {
            println!("{date}: content identical, aligned local timestamp.");
        }
    }
    Ok(())
}

/// CLI conflict resolution: either a pre-bound `--resolve` decision, or a
/// diff followed by a terminal prompt.
struct CliResolver {
    preset: Option<ResolveChoice>,
}

impl CliResolver {
    fn new(preset: Option<ResolveChoice>) -> Self {
        Self { preset }
    }
}

impl ConflictResolver for CliResolver {
    fn resolve(
        &self,
        local_path: &Path,
        remote_content: &str,
        conflicts: &[String],
    ) -> Result<Decision> {
        if let Some(choice) = self.preset {
            return Ok(match choice {
                ResolveChoice::Local => Decision::KeepLocal,
                ResolveChoice::Remote => Decision::TakeRemote,
            });
        }

        println!(
            "{} {}",
            "Sections changed on both sides:".yellow().bold(),
            conflicts.join(", ")
        );
        show_diff(local_path, remote_content)?;

        print!("Overwrite local with remote? [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;

        if answer.trim().eq_ignore_ascii_case("y") {
            Ok(Decision::TakeRemote)
        } else {
            Ok(Decision::KeepLocal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_local_skips_prompt() {
        let resolver = CliResolver::new(Some(ResolveChoice::Local));
        let decision = resolver
            .resolve(Path::new("/tmp/x.md"), "remote", &["Notes".to_string()])
            .unwrap();
        assert_eq!(decision, Decision::KeepLocal);
    }

    #[test]
    fn test_preset_remote_skips_prompt() {
        let resolver = CliResolver::new(Some(ResolveChoice::Remote));
        let decision = resolver
            .resolve(Path::new("/tmp/x.md"), "remote", &["Notes".to_string()])
            .unwrap();
        assert_eq!(decision, Decision::TakeRemote);
    }
}
