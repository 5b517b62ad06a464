//! HTTP implementation of the remote journal store.
//!
//! Talks to the journal web service over `GET`/`PUT {base}/entries/{date}`
//! with a bearer token. Requests carry a bounded timeout so an unresponsive
//! remote surfaces as a retriable connectivity failure instead of hanging.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::remote::{RemoteEntry, RemoteStore};

/// Request timeout for fetch and store calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the remote journal service.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct PutEntryRequest<'a> {
    content: &'a str,
}

impl HttpRemote {
    /// Create a client for the service at `base_url` using `token` as the
    /// bearer credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn entry_url(&self, date: NaiveDate) -> String {
        format!("{}/entries/{date}", self.base_url)
    }
}

/// Map a transport-level failure to an engine error kind.
///
/// Anything without an HTTP status (DNS, refused connection, timeout) is
/// connectivity; the sync aborted before any write, so re-running is safe.
fn transport_error(e: &reqwest::Error) -> Error {
    Error::Connectivity(e.to_string())
}

/// Map a non-success HTTP status to an engine error kind.
async fn status_error(response: reqwest::Response) -> Error {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Error::Authentication(format!("remote rejected credentials ({status})"));
    }
    let message = response.text().await.unwrap_or_default();
    Error::Server {
        status: status.as_u16(),
        message,
    }
}

impl RemoteStore for HttpRemote {
    async fn fetch(&self, date: NaiveDate) -> Result<Option<RemoteEntry>> {
        let response = self
            .client
            .get(self.entry_url(date))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let entry: RemoteEntry = response
            .json()
            .await
            .map_err(|e| Error::Other(format!("invalid entry response: {e}")))?;
        Ok(Some(entry))
    }

    async fn store(&self, date: NaiveDate, content: &str) -> Result<RemoteEntry> {
        let response = self
            .client
            .put(self.entry_url(date))
            .bearer_auth(&self.token)
            .json(&PutEntryRequest { content })
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let entry: RemoteEntry = response
            .json()
            .await
            .map_err(|e| Error::Other(format!("invalid entry response: {e}")))?;
        Ok(entry)
    }
}
