//! # Polling runtime configuration.
//!
//! Provides [`PollerConfig`], the centralized settings for one polling
//! session.
//!
//! ## Sentinel values
//! - `transition_delay = 0s` → publish changed updates immediately (no hold)
//! - `bus_capacity` is clamped to a minimum of 1 by the bus

use std::time::Duration;

use crate::policies::RetryPolicy;

/// Configuration for a polling session.
///
/// ## Field semantics
/// - `interval`: time between ticks; the first fetch happens immediately
/// - `retry`: attempt budget and delay schedule, handed to the source per call
/// - `transition_delay`: minimum hold before publishing a *changed* update
///   (`0s` = immediate); exists because re-rendering a loading state for less
///   than a frame reads as flicker on some displays
/// - `grace`: how long `stop()` waits for the loop to drain before giving up
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug)]
pub struct PollerConfig {
    /// Time between polls.
    pub interval: Duration,

    /// Retry policy supplied to the source on every fetch.
    pub retry: RetryPolicy,

    /// Minimum hold before a changed update is published (`0s` = none).
    ///
    /// The hold sleep is cancellable: a `stop()` during the hold suppresses
    /// the publish entirely.
    pub transition_delay: Duration,

    /// Maximum time `stop()` waits for the session loop to exit.
    ///
    /// An in-flight read is never aborted; it is bounded by the transport's
    /// own per-attempt timeout, so the default grace comfortably covers one.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl PollerConfig {
    /// Returns the transition hold as an `Option`.
    ///
    /// - `None` → publish immediately
    /// - `Some(d)` → hold changed updates for `d`
    #[inline]
    pub fn transition_hold(&self) -> Option<Duration> {
        if self.transition_delay == Duration::ZERO {
            None
        } else {
            Some(self.transition_delay)
        }
    }
}

impl Default for PollerConfig {
    /// Default configuration:
    ///
    /// - `interval = 10s` (aggregator-friendly poll rate)
    /// - `retry = RetryPolicy::default()` (3 attempts, 3s constant delay)
    /// - `transition_delay = 0s` (publish immediately)
    /// - `grace = 10s` (covers one full in-flight attempt)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            transition_delay: Duration::ZERO,
            grace: Duration::from_secs(10),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_transition_delay_means_no_hold() {
        let cfg = PollerConfig::default();
        assert_eq!(cfg.transition_hold(), None);

        let cfg = PollerConfig {
            transition_delay: Duration::from_millis(800),
            ..PollerConfig::default()
        };
        assert_eq!(cfg.transition_hold(), Some(Duration::from_millis(800)));
    }
}
