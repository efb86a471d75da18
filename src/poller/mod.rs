//! Polling runtime: session loop and lifecycle.
//!
//! This module contains the embedded implementation of the pricevisor
//! runtime. The public API is [`PollSession`] (spawns the loop), the
//! [`PollHandle`] it returns, and [`PollerConfig`].
//!
//! Internal structure:
//! - [`config`]: runtime knobs (interval, retry, transition delay, grace);
//! - [`session`]: the serialized tick loop - fetch, gate, guarded publish;
//! - [`handle`]: consumer-facing handle - latest-update stream, liveness,
//!   graceful stop.

mod config;
mod handle;
mod session;

pub use config::PollerConfig;
pub use handle::PollHandle;
pub use session::PollSession;
