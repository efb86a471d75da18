//! # Runtime events emitted by the polling session.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Session lifecycle**: poll loop started/stopped
//! - **Fetch lifecycle**: attempt started, failed, retry scheduled
//! - **Publication**: a quote (or failure) was published to consumers
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! source name, attempt number, HTTP status, and retry delay.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use pricevisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::FetchFailed)
//!     .with_source("dexscreener")
//!     .with_reason("HTTP 503")
//!     .with_attempt(2);
//!
//! assert_eq!(ev.kind, EventKind::FetchFailed);
//! assert_eq!(ev.source.as_deref(), Some("dexscreener"));
//! assert_eq!(ev.reason.as_deref(), Some("HTTP 503"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Session lifecycle ===
    /// Polling session started its loop.
    ///
    /// Sets:
    /// - `source`: source name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    PollStarted,

    /// Polling session exited its loop (stop requested or loop ended).
    ///
    /// Sets:
    /// - `source`: source name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    PollStopped,

    // === Fetch lifecycle ===
    /// A fetch attempt is starting.
    ///
    /// Sets:
    /// - `source`: source name
    /// - `attempt`: attempt number (1-based, per fetch)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    FetchStarting,

    /// A fetch attempt failed (transient or terminal).
    ///
    /// Sets:
    /// - `source`: source name
    /// - `attempt`: attempt number
    /// - `status`: HTTP status, when the failure was status-driven
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    FetchFailed,

    /// A retry was scheduled after a transient failure.
    ///
    /// Sets:
    /// - `source`: source name
    /// - `attempt`: the attempt that just failed
    /// - `delay_ms`: delay before the next attempt (ms)
    /// - `reason`: last failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RetryScheduled,

    // === Publication ===
    /// An update was published to consumers.
    ///
    /// Sets:
    /// - `source`: source name
    /// - `value`: published price, absent on failure/no-data
    /// - `changed`: whether the gate saw a visible transition
    /// - `reason`: failure label, when the published outcome was a failure
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    QuotePublished,

    /// The source has no contract address configured; the poll was
    /// short-circuited without a network call.
    ///
    /// Sets:
    /// - `source`: source name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SourceUnconfigured,

    // === Subscriber plumbing ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Source (or subscriber) name, if applicable.
    pub source: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// HTTP status for status-driven failures.
    pub status: Option<u16>,
    /// Retry delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Published price value.
    pub value: Option<f64>,
    /// Whether the published update was a visible transition.
    pub changed: Option<bool>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            source: None,
            attempt: None,
            status: None,
            delay_ms: None,
            value: None,
            changed: None,
            reason: None,
        }
    }

    /// Attaches a source (or subscriber) name.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches an HTTP status.
    #[inline]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a retry delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a published value.
    #[inline]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches the gate's changed decision.
    #[inline]
    pub fn with_changed(mut self, changed: bool) -> Self {
        self.changed = Some(changed);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::PollStarted);
        let b = Event::new(EventKind::PollStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::RetryScheduled)
            .with_source("dexscreener")
            .with_attempt(2)
            .with_status(503)
            .with_delay(Duration::from_millis(100))
            .with_reason("HTTP 503");
        assert_eq!(ev.source.as_deref(), Some("dexscreener"));
        assert_eq!(ev.attempt, Some(2));
        assert_eq!(ev.status, Some(503));
        assert_eq!(ev.delay_ms, Some(100));
        assert_eq!(ev.reason.as_deref(), Some("HTTP 503"));
    }
}
