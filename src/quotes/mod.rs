//! # Quote data model and change detection.
//!
//! This module provides the value objects that flow out of a polling session:
//! - [`QuoteSnapshot`] - one decoded read of the aggregator
//! - [`Update`] - the published payload (tagged outcome + changed flag)
//! - [`StalenessGate`] - decides whether an incoming snapshot is a visible change

mod gate;
mod snapshot;

pub use gate::StalenessGate;
pub use snapshot::{QuoteSnapshot, Update};
