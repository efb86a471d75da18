//! # Event subscribers for the pricevisor runtime.
//!
//! This module provides the [`Subscribe`] trait and the fan-out machinery
//! that delivers runtime [`Event`](crate::events::Event)s to user code:
//! - [`Subscribe`] - extension point for custom event handlers
//! - [`SubscriberSet`] - non-blocking fan-out with per-subscriber queues
//! - `LogWriter` - built-in log-crate subscriber (behind the `logging` feature)

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
