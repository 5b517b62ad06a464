//! Remote journal store collaborators.
//!
//! The sync engine depends on exactly two remote behaviors: fetch the
//! journal entry for a date, and store new content for a date. Everything
//! else (auth refresh, storage, rendering) is the service's problem.
//!
//! - [`RemoteStore`] - the fetch/store capability the engine is generic over
//! - [`HttpRemote`] - the production HTTP implementation
//! - [`credentials`] - bearer token resolution

pub mod credentials;
mod http;

pub use credentials::{CredentialProvider, DefaultCredentials};
pub use http::HttpRemote;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A journal entry as held by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Full markdown content.
    pub content: String,
    /// Server-side modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fetch/store access to the remote journal service.
///
/// The engine is generic over this trait so tests can substitute an
/// in-memory store and front ends can wrap other transports.
pub trait RemoteStore {
    /// Fetch the entry for a date. `Ok(None)` means no entry exists yet,
    /// which is not an error (it triggers a push).
    fn fetch(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Option<RemoteEntry>>> + Send;

    /// Store new content for a date, returning the entry as the server
    /// now holds it (with its authoritative `updated_at`).
    fn store(
        &self,
        date: NaiveDate,
        content: &str,
    ) -> impl std::future::Future<Output = Result<RemoteEntry>> + Send;
}
