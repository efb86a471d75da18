//! # Quote sources and the HTTP fetch pipeline.
//!
//! This module provides everything between the polling session and the wire:
//! - [`Transport`] - one HTTP read, the seam tests script ([`HttpTransport`]
//!   is the reqwest-backed production implementation)
//! - [`fetch_with_retry`] - the bounded attempt loop over a transport
//! - [`QuoteSource`] - trait for anything that can produce a
//!   [`QuoteSnapshot`](crate::QuoteSnapshot) ([`SourceFn`] wraps a closure)
//! - [`DexSource`] - the price-aggregator client

mod dexscreener;
mod quote_source;
mod retry;
mod source_fn;
mod transport;

pub use dexscreener::{DexConfig, DexSource};
pub use quote_source::{FetchContext, QuoteSource, SourceRef};
pub use retry::fetch_with_retry;
pub use source_fn::SourceFn;
pub use transport::{ATTEMPT_TIMEOUT, HttpResponse, HttpTransport, Transport, TransportError};
