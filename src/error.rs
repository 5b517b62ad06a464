//! Error types for the Daybook CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=connectivity, 3=auth, 4=server, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for Daybook operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Network (exit 2)
    ConnectivityError,

    // Credentials (exit 3)
    AuthenticationError,

    // Remote (exit 4)
    ServerError,

    // Config (exit 5)
    ConfigError,
    InvalidDate,

    // I/O (exit 6)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::ConnectivityError => "CONNECTIVITY_ERROR",
            Self::AuthenticationError => "AUTHENTICATION_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InvalidDate => "INVALID_DATE",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-6).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ConnectivityError => 2,
            Self::AuthenticationError => 3,
            Self::ServerError => 4,
            Self::ConfigError | Self::InvalidDate => 5,
            Self::IoError | Self::JsonError => 6,
        }
    }

    /// Whether re-running the same invocation can succeed.
    ///
    /// Every sync pass recomputes its comparison from current local and
    /// remote state, so connectivity and server failures are safe to
    /// retry as-is. Config and credential problems need fixing first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectivityError | Self::ServerError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Daybook CLI operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Remote unreachable: {0}")]
    Connectivity(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Remote returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Connectivity(_) => ErrorCode::ConnectivityError,
            Self::Authentication(_) => ErrorCode::AuthenticationError,
            Self::Server { .. } => ErrorCode::ServerError,
            Self::InvalidDate { .. } => ErrorCode::InvalidDate,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for humans and scripts.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Connectivity(_) => Some(
                "Check your network connection and re-run. No local changes \
                 were made; sync is always safe to retry."
                    .to_string(),
            ),

            Self::Authentication(_) => Some(
                "Set DAYBOOK_TOKEN or write a bearer token to \
                 ~/.daybook/credentials."
                    .to_string(),
            ),

            Self::InvalidDate { .. } => {
                Some("Pass the date as YYYY-MM-DD, e.g. `daybook sync 2025-06-01`.".to_string())
            }

            Self::Config(msg) if msg.contains("remote") => Some(
                "Pass --remote <url> or set DAYBOOK_REMOTE to the journal \
                 service base URL."
                    .to_string(),
            ),

            Self::Server { .. }
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
