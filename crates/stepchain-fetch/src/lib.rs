//! Stepchain Page Transport
//!
//! Retrieves the raw text of a *location*, which is either a local path or an
//! `http://` / `https://` address. The consensus engine only needs
//! [`PageFetch::fetch`]: all-or-nothing per call, `None` on any failure.
//!
//! # Failure Model
//!
//! Unreachable hosts, non-200 statuses, timeouts, malformed streams and blank
//! pages all collapse to `None`. Callers treat a missing page as an absent
//! snapshot and never retry it within the same sample.

mod error;

pub use error::{FetchError, Result};

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default per-location budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can turn a location into page text.
pub trait PageFetch: Send + Sync {
    /// Fetch the page at `location`, or `None` if it could not be retrieved.
    fn fetch(&self, location: &str) -> impl Future<Output = Option<String>> + Send;
}

impl<T: PageFetch> PageFetch for Arc<T> {
    fn fetch(&self, location: &str) -> impl Future<Output = Option<String>> + Send {
        (**self).fetch(location)
    }
}

/// Configuration for [`LocationFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Budget for one location, covering connect, headers and body
    pub timeout: Duration,
    /// Accept self-signed or otherwise invalid TLS certificates
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

/// Fetches local paths from disk and HTTP(S) addresses over the network.
#[derive(Debug, Clone)]
pub struct LocationFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl LocationFetcher {
    /// Build a fetcher. Redirects are not followed.
    ///
    /// The whole-request budget is enforced by [`try_fetch`](Self::try_fetch);
    /// the client itself only bounds connecting.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Fetch `location`, reporting why it failed.
    pub async fn try_fetch(&self, location: &str) -> Result<String> {
        let text = match tokio::time::timeout(self.timeout, self.load(location)).await {
            Ok(result) => result?,
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };
        if text.is_empty() {
            return Err(FetchError::Blank);
        }
        Ok(text)
    }

    async fn load(&self, location: &str) -> Result<String> {
        if is_network_location(location) {
            let response = self.client.get(location).send().await?;
            let status = response.status();
            if status != reqwest::StatusCode::OK {
                return Err(FetchError::Status(status.as_u16()));
            }
            Ok(response.text().await?)
        } else {
            Ok(tokio::fs::read_to_string(Path::new(location)).await?)
        }
    }
}

impl PageFetch for LocationFetcher {
    async fn fetch(&self, location: &str) -> Option<String> {
        match self.try_fetch(location).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(location, error = %e, "could not get the page");
                None
            }
        }
    }
}

/// Check whether `location` must be fetched over HTTP(S).
pub fn is_network_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
