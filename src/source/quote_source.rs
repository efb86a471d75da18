//! # Quote source abstraction.
//!
//! This module defines the [`QuoteSource`] trait (async, cancelable) that the
//! polling session drives, and the [`FetchContext`] handed to each fetch.
//! The common handle type is [`SourceRef`], an `Arc<dyn QuoteSource>`
//! suitable for sharing across the runtime.
//!
//! A source receives the session's cancellation token through the context and
//! should check it around long waits so teardown stays prompt.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::events::Bus;
use crate::policies::RetryPolicy;
use crate::quotes::QuoteSnapshot;

/// Per-fetch context supplied by the owning session.
///
/// The token is the session's lifecycle guard: a source observing it
/// cancelled should stop waiting and return [`FetchError::Canceled`].
#[derive(Clone)]
pub struct FetchContext {
    /// Session cancellation token.
    pub token: CancellationToken,
    /// Event bus for fetch lifecycle events.
    pub bus: Bus,
    /// Retry policy for this fetch, supplied per call.
    pub retry: RetryPolicy,
}

impl FetchContext {
    /// Creates a detached context (fresh token, private bus, default policy).
    ///
    /// Useful for driving a source outside a session, e.g. in tests.
    pub fn detached() -> Self {
        Self {
            token: CancellationToken::new(),
            bus: Bus::new(16),
            retry: RetryPolicy::default(),
        }
    }
}

/// Shared reference to a quote source.
pub type SourceRef = Arc<dyn QuoteSource>;

/// # Asynchronous, cancelable quote producer.
///
/// A `QuoteSource` has a stable [`name`](QuoteSource::name) and an async
/// [`fetch`](QuoteSource::fetch) that retrieves and decodes one snapshot.
/// Retries (if any) happen inside `fetch`; the session treats each call as
/// one logical read.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use pricevisor::{FetchContext, FetchError, QuoteSnapshot, QuoteSource};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl QuoteSource for Fixed {
///     fn name(&self) -> &str { "fixed" }
///
///     async fn fetch(&self, _ctx: FetchContext) -> Result<QuoteSnapshot, FetchError> {
///         Ok(QuoteSnapshot::new(1.0, "fixed"))
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteSource: Send + Sync + 'static {
    /// Returns a stable, human-readable source name.
    fn name(&self) -> &str;

    /// Retrieves and decodes one snapshot, or reports why it could not.
    async fn fetch(&self, ctx: FetchContext) -> Result<QuoteSnapshot, FetchError>;
}
