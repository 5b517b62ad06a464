//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Daybook CLI - two-way sync for daily markdown journals
#[derive(Parser, Debug)]
#[command(name = "daybook", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Journal directory (default: ~/.daybook/journal)
    #[arg(long, global = true, env = "DAYBOOK_DIR")]
    pub journal_dir: Option<PathBuf>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile the journal entry for a date with the remote service
    Sync {
        /// Date to sync (YYYY-MM-DD, defaults to today)
        date: Option<String>,

        /// Remote journal service base URL
        #[arg(long, env = "DAYBOOK_REMOTE")]
        remote: Option<String>,

        /// Resolve conflicts without prompting
        #[arg(long, value_enum)]
        resolve: Option<ResolveChoice>,
    },

    /// Show the local entry and last confirmed sync point for a date
    Status {
        /// Date to inspect (YYYY-MM-DD, defaults to today)
        date: Option<String>,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Pre-bound conflict decision for non-interactive use.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ResolveChoice {
    /// Keep local content and push it
    Local,
    /// Overwrite local content with the remote entry
    Remote,
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
