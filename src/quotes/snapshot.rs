//! # Quote snapshot and published update.
//!
//! [`QuoteSnapshot`] is one decoded read of the price source: immutable once
//! constructed, produced by the decode step after a successful fetch.
//! [`Update`] is what the session actually publishes: the snapshot (or the
//! failure that prevented one) plus the changed flag computed by the
//! [`StalenessGate`](crate::quotes::StalenessGate).
//!
//! ## Rules
//! - A failed fetch still produces an `Update`; the failure kind is preserved
//!   in [`Update::outcome`] rather than flattened into an empty snapshot, so
//!   consumers can tell "genuinely no data" from "fetch failed".
//! - [`Update::value`] collapses failures to `None`, which is what a display
//!   layer that shows nothing on failure should read.

use std::sync::Arc;
use std::time::SystemTime;

use crate::error::FetchError;

/// One decoded read of the price source.
///
/// All payload fields are optional: the aggregator may know the pair but not
/// report a 24h change, or may return no pair at all.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteSnapshot {
    /// Current price in USD, if the source reported one.
    pub value: Option<f64>,
    /// 24-hour percentage change, if reported.
    pub change_24h: Option<f64>,
    /// Fully diluted valuation, if reported.
    pub fdv: Option<f64>,
    /// Label of the source that produced the value (e.g. "dexscreener").
    pub source: Option<Arc<str>>,
    /// When this snapshot was decoded.
    pub observed_at: SystemTime,
}

impl QuoteSnapshot {
    /// Creates a snapshot carrying a value from the named source.
    pub fn new(value: f64, source: impl Into<Arc<str>>) -> Self {
        Self {
            value: Some(value),
            change_24h: None,
            fdv: None,
            source: Some(source.into()),
            observed_at: SystemTime::now(),
        }
    }

    /// Creates the no-data snapshot (no value, no source).
    pub fn empty() -> Self {
        Self {
            value: None,
            change_24h: None,
            fdv: None,
            source: None,
            observed_at: SystemTime::now(),
        }
    }

    /// Attaches a 24-hour change figure.
    #[inline]
    pub fn with_change_24h(mut self, change: f64) -> Self {
        self.change_24h = Some(change);
        self
    }

    /// Attaches a fully diluted valuation figure.
    #[inline]
    pub fn with_fdv(mut self, fdv: f64) -> Self {
        self.fdv = Some(fdv);
        self
    }

    /// True if this snapshot carries no price.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// The payload a polling session publishes on every tick.
#[derive(Clone, Debug)]
pub struct Update {
    /// The decoded snapshot, or the failure that prevented one.
    pub outcome: Result<QuoteSnapshot, FetchError>,
    /// Whether this update represents a visible change (first observation or
    /// a different value); consumers use it to gate loading transitions.
    pub changed: bool,
    /// When the session published this update.
    pub at: SystemTime,
}

impl Update {
    /// Creates an update from a fetch outcome and a gate decision.
    pub fn new(outcome: Result<QuoteSnapshot, FetchError>, changed: bool) -> Self {
        Self {
            outcome,
            changed,
            at: SystemTime::now(),
        }
    }

    /// The published value with failures collapsed to `None`.
    ///
    /// This reproduces the show-nothing-on-failure display behavior; read
    /// [`Update::outcome`] instead when the failure kind matters.
    pub fn value(&self) -> Option<f64> {
        self.outcome.as_ref().ok().and_then(|s| s.value)
    }

    /// The source label, `None` on failure or when no source replied.
    pub fn source(&self) -> Option<&str> {
        self.outcome
            .as_ref()
            .ok()
            .and_then(|s| s.source.as_deref())
    }
}
