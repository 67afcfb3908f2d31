//! HTTP transport for image API calls.
//!
//! One GET per invocation, bounded by the configured timeout, no retries.
//! Whatever the server answers — any status, any content type — is handed to
//! the resolver for classification; only transport-level failures (DNS, TLS,
//! connect, timeout, body read) surface as [`FetchError`].

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error};

use crate::resolver::{self, Resolution};

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure: DNS, TLS, connect, timeout, interrupted body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The HTTP client could not be constructed from the given settings.
    #[error("http client error: {0}")]
    Client(String),
}

/// Shared HTTP fetcher, built once at startup.
///
/// Cheaply cloneable — `reqwest::Client` is an `Arc` internally — and holds
/// no mutable state, so concurrent invocations can share one instance.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher with the given timeout and TLS policy.
    ///
    /// Certificate verification is on unless the config explicitly opted
    /// out with `verify_tls = false`.
    pub fn new(timeout_seconds: u64, verify_tls: bool) -> Result<Self, FetchError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(timeout_seconds));
        if !verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// One GET round-trip, classified by the resolver.
    pub async fn fetch(&self, url: &str) -> Result<Resolution, FetchError> {
        debug!(%url, "sending image API request");

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(%url, error = %e, "image API request failed (transport)");
            FetchError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("failed reading body: {e}")))?;

        debug!(
            status,
            content_type = content_type.as_deref().unwrap_or("<none>"),
            body_len = body.len(),
            "image API response received"
        );

        Ok(resolver::resolve(status, content_type.as_deref(), &body))
    }
}
