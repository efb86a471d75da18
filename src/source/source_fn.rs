//! # Function-backed quote source (`SourceFn`)
//!
//! [`SourceFn`] wraps a closure `F: Fn(FetchContext) -> Fut`, producing a
//! fresh future per fetch. This avoids shared mutable state; if a closure
//! needs state across fetches, hold an `Arc<...>` explicitly inside it.
//!
//! ## Example
//! ```rust
//! use pricevisor::{FetchContext, FetchError, QuoteSnapshot, QuoteSource, SourceFn, SourceRef};
//!
//! let s: SourceRef = SourceFn::arc("fixed", |_ctx: FetchContext| async move {
//!     Ok::<_, FetchError>(QuoteSnapshot::new(1.0, "fixed"))
//! });
//!
//! assert_eq!(s.name(), "fixed");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::quotes::QuoteSnapshot;
use crate::source::quote_source::{FetchContext, QuoteSource};

/// Function-backed quote source implementation.
///
/// Wraps a closure that *creates* a new future per fetch.
#[derive(Debug)]
pub struct SourceFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SourceFn<F> {
    /// Creates a new function-backed source.
    ///
    /// Prefer [`SourceFn::arc`] when you immediately need a
    /// [`SourceRef`](crate::source::SourceRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the source and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> QuoteSource for SourceFn<F>
where
    F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<QuoteSnapshot, FetchError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, ctx: FetchContext) -> Result<QuoteSnapshot, FetchError> {
        (self.f)(ctx).await
    }
}
