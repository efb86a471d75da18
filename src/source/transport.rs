//! # Transport: one HTTP read.
//!
//! [`Transport`] abstracts a single GET so the retry loop and the decoder can
//! be exercised against scripted responses. The production implementation is
//! [`HttpTransport`] (reqwest); every read it issues is bounded by the fixed
//! [`ATTEMPT_TIMEOUT`], independent of any retry policy.
//!
//! ## Rules
//! - One call to [`Transport::get`] is exactly one network read.
//! - A transport error is by definition network-level (connect, DNS,
//!   timeout) and therefore transient; status classification is the retry
//!   loop's job, not the transport's.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Fixed per-attempt bound on one network read.
///
/// This is deliberately independent of the retry policy: a hung read is cut
/// after 5 seconds no matter how patient the caller's delay schedule is.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Network-level failure of a single read (connect, DNS, timeout).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One HTTP response: status plus raw body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// True for 2xx statuses.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// # One HTTP read.
///
/// Implementations issue exactly one network request per [`get`](Transport::get)
/// call and never retry internally.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Issues one GET and returns the raw response.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport with the fixed per-attempt timeout.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let resp = self
            .client
            .get(url)
            .timeout(ATTEMPT_TIMEOUT)
            .header("User-Agent", concat!("pricevisor/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}
