//! Bearer token resolution for the remote journal service.
//!
//! The engine never inspects credentials; it only distinguishes "a token
//! was available" from an authentication failure reported by the remote.
//! Token refresh is the service account's concern, not ours.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Source of the bearer token presented to the remote service.
pub trait CredentialProvider {
    /// A usable bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if no token can be resolved.
    fn bearer_token(&self) -> Result<String>;
}

/// Default resolution: `DAYBOOK_TOKEN` env var, then the credentials file.
#[derive(Debug)]
pub struct DefaultCredentials {
    token_path: Option<PathBuf>,
}

impl DefaultCredentials {
    /// Provider reading from the standard locations
    /// (`DAYBOOK_TOKEN`, then `~/.daybook/credentials`).
    #[must_use]
    pub fn new() -> Self {
        let token_path = directories::BaseDirs::new()
            .map(|b| b.home_dir().join(".daybook").join("credentials"));
        Self { token_path }
    }

    /// Provider reading the token file at an explicit path (used in tests
    /// and by front ends with their own credential layout).
    #[must_use]
    pub fn with_token_path(path: PathBuf) -> Self {
        Self {
            token_path: Some(path),
        }
    }
}

impl Default for DefaultCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for DefaultCredentials {
    fn bearer_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var("DAYBOOK_TOKEN") {
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Ok(token);
            }
        }

        if let Some(path) = &self.token_path {
            if let Ok(raw) = std::fs::read_to_string(path) {
                let token = raw.trim().to_string();
                if !token.is_empty() {
                    return Ok(token);
                }
            }
        }

        Err(Error::Authentication("no token configured".to_string()))
    }
}
