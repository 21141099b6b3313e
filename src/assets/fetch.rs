use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Context;

use crate::foundation::error::CardResult;

/// Failure of a single network operation.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    /// Connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Body could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Network capability the card pipeline depends on.
///
/// Implementations must be shareable across the rayon pool: item resolution calls into the
/// same fetcher from several workers at once.
pub trait Fetcher: Send + Sync {
    /// Lightweight existence check. No body is transferred.
    fn probe(&self, url: &str) -> bool;

    /// Fetch the full response body.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// Fetch and parse a JSON document.
    fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let bytes = self.fetch_bytes(url)?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Blocking HTTP fetcher backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> CardResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("outfit-card/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send() {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(url, error = %e, "probe failed");
                false
            }
        }
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp
            .bytes()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[derive(Clone, Debug)]
enum StaticResponse {
    Body(Arc<Vec<u8>>),
    Status(u16),
}

/// In-memory fetcher keyed by exact URL.
///
/// Unknown URLs answer 404. Every call is recorded so callers can assert which requests
/// a render performed.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, StaticResponse>,
    log: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for GET and HEAD on `url`.
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(url.into(), StaticResponse::Body(Arc::new(body.into())));
        self
    }

    /// Serve a JSON document on `url`.
    pub fn with_json(self, url: impl Into<String>, value: &serde_json::Value) -> Self {
        self.with_body(url, value.to_string().into_bytes())
    }

    /// Answer `status` (no body) on `url`.
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .insert(url.into(), StaticResponse::Status(status));
        self
    }

    /// Requests seen so far, formatted as `"HEAD <url>"` / `"GET <url>"`.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn record(&self, method: &str, url: &str) {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("{method} {url}"));
        }
    }
}

impl Fetcher for StaticFetcher {
    fn probe(&self, url: &str) -> bool {
        self.record("HEAD", url);
        matches!(self.responses.get(url), Some(StaticResponse::Body(_)))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.record("GET", url);
        match self.responses.get(url) {
            Some(StaticResponse::Body(body)) => Ok(body.as_ref().clone()),
            Some(StaticResponse::Status(code)) => Err(FetchError::Status(*code)),
            None => Err(FetchError::Status(404)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
