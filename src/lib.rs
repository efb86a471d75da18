//! # pricevisor
//!
//! **Pricevisor** is a small resilient-polling library for token price data.
//!
//! It repeatedly retrieves a price/FDV payload from an external aggregator,
//! tolerates transient server failures via bounded retry-with-backoff, and
//! publishes a latest-value stream to consumers while suppressing redundant
//! "loading" transitions when the retrieved value has not actually changed.
//!
//! ## Architecture
//! ```text
//!     ┌───────────────┐      ┌──────────────────────────────┐
//!     │ PollerConfig  │      │  QuoteSource (DexSource,     │
//!     │ (interval,    │      │  SourceFn, or your own impl) │
//!     │  retry, hold) │      └──────────────┬───────────────┘
//!     └──────┬────────┘                     │
//!            ▼                              ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  PollSession (serialized tick loop)                           │
//! │  - immediate first fetch, then one per interval               │
//! │  - fetch_with_retry: transient vs fatal, bounded attempts     │
//! │  - StalenessGate: changed only on a genuinely new value       │
//! │  - CancellationToken guard: nothing publishes after stop()    │
//! └──────┬──────────────────────────────┬─────────────────────────┘
//!        │                              │
//!        ▼                              ▼
//!   watch channel                  Bus (broadcast)
//!   (latest Update)                     │
//!        │                              ▼
//!        ▼                       SubscriberSet
//!   PollHandle::updates()      ┌─────────┼─────────┐
//!                              ▼         ▼         ▼
//!                          sub1.on_  sub2.on_  subN.on_
//!                           event()   event()   event()
//! ```
//!
//! ## Lifecycle
//! ```text
//! PollSession::new(cfg, source, subs) ──► spawn() ──► loop
//!
//! loop {
//!   ├─► tick (first is immediate; ticks never overlap)
//!   ├─► source.fetch(ctx)
//!   │       └─ fetch_with_retry:
//!   │            ├─ 2xx                    ─► decode snapshot
//!   │            ├─ 429/502/503, net error ─► delay, retry (≤ max_attempts)
//!   │            └─ other non-2xx          ─► FatalHttp, no retry
//!   ├─► changed = StalenessGate(last_published, snapshot)
//!   └─► token still live?
//!         ├─ yes ─► publish Update{outcome, changed} + QuotePublished event
//!         └─ no  ─► discard, exit
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                   |
//! |-------------------|---------------------------------------------------------------|--------------------------------------|
//! | **Polling**       | Serialized tick loop with clean start/stop.                   | [`PollSession`], [`PollHandle`]      |
//! | **Retry**         | Bounded attempts, transient/fatal split, optional jitter.     | [`RetryPolicy`], [`JitterPolicy`]    |
//! | **Change gating** | Suppress loading churn when the value did not change.         | [`StalenessGate`], [`Update`]        |
//! | **Sources**       | Aggregator client, or bring your own via trait/closure.       | [`QuoteSource`], [`DexSource`], [`SourceFn`] |
//! | **Subscriber API**| Hook into fetch/publish lifecycle events.                     | [`Subscribe`], [`Event`]             |
//! | **Errors**        | Typed failure taxonomy preserved end to end.                  | [`FetchError`], [`PollError`]        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pricevisor::{DexConfig, DexSource, PollSession, PollerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = PollerConfig::default();
//!     cfg.interval = Duration::from_secs(10);
//!
//!     let source = Arc::new(DexSource::new(DexConfig::for_contract(
//!         "0x50f88fe97f72cd3e75b9eb4f747f59bceba80d59",
//!     )));
//!
//!     let handle = PollSession::new(cfg, source, Vec::new()).spawn();
//!     let mut updates = handle.updates();
//!
//!     while updates.changed().await.is_ok() {
//!         let latest = updates.borrow().clone();
//!         if let Some(update) = latest {
//!             match update.value() {
//!                 Some(price) if update.changed => println!("price moved: {price}"),
//!                 Some(price) => println!("price steady: {price}"),
//!                 None => println!("no data"),
//!             }
//!         }
//!     }
//!
//!     handle.stop().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod events;
mod policies;
mod poller;
mod quotes;
mod source;
mod subscribers;

// ---- Public re-exports ----

pub use error::{FetchError, PollError};
pub use events::{Bus, Event, EventKind};
pub use policies::{JitterPolicy, RetryPolicy};
pub use poller::{PollHandle, PollSession, PollerConfig};
pub use quotes::{QuoteSnapshot, StalenessGate, Update};
pub use source::{
    ATTEMPT_TIMEOUT, DexConfig, DexSource, FetchContext, HttpResponse, HttpTransport, QuoteSource,
    SourceFn, SourceRef, Transport, TransportError, fetch_with_retry,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
