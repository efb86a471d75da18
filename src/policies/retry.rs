//! # Retry policy for quote fetches.
//!
//! [`RetryPolicy`] bounds how many reads one logical fetch may issue and how
//! long to pause between them. It is parameterized by:
//! - [`RetryPolicy::max_attempts`] the attempt budget (at least 1);
//! - [`RetryPolicy::delay`] the initial inter-attempt delay;
//! - [`RetryPolicy::growth`] the multiplicative growth factor;
//! - [`RetryPolicy::max_delay`] the delay cap;
//! - [`RetryPolicy::retryable`] the HTTP statuses worth another attempt.
//!
//! The delay for attempt `n` is computed as `delay × growth^n`, clamped to
//! `max_delay`, then jitter is applied. Because the base delay is derived
//! purely from the attempt number, jitter output never feeds back into
//! subsequent calculations — this prevents the negative feedback loop that
//! causes delays to shrink over time.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use pricevisor::{JitterPolicy, RetryPolicy};
//!
//! let policy = RetryPolicy {
//!     max_attempts: 3,
//!     delay: Duration::from_millis(100),
//!     growth: 2.0,
//!     max_delay: Duration::from_secs(10),
//!     jitter: JitterPolicy::None,
//!     ..RetryPolicy::default()
//! };
//!
//! // Delay after attempt 1 uses `delay` (100ms)
//! assert_eq!(policy.delay_for(1), Duration::from_millis(100));
//!
//! // Delay after attempt 2 — delay × growth^1 = 200ms
//! assert_eq!(policy.delay_for(2), Duration::from_millis(200));
//!
//! // Rate-limit and overload statuses are retryable, client errors are not
//! assert!(policy.is_retryable_status(429));
//! assert!(!policy.is_retryable_status(404));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Bounded retry policy for one logical fetch.
///
/// Statuses in [`RetryPolicy::retryable`] mark retry-storm-style server
/// trouble (rate limit, overload); every other failing status is treated as a
/// permanently broken request and fails the fetch on the spot.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Maximum number of reads issued per fetch (`>= 1`; 0 is clamped to 1).
    pub max_attempts: u32,
    /// Initial delay between attempts.
    pub delay: Duration,
    /// Multiplicative growth factor (`1.0` = constant delay).
    pub growth: f64,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// Jitter policy applied to the clamped delay.
    pub jitter: JitterPolicy,
    /// HTTP statuses that count as transient failures.
    pub retryable: Vec<u16>,
}

impl Default for RetryPolicy {
    /// Returns the aggregator-friendly defaults:
    /// - `max_attempts = 3`;
    /// - `delay = 3s`, `growth = 1.0` (constant), `max_delay = 30s`;
    /// - `retryable = [429, 502, 503]`;
    /// - no jitter.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
            growth: 1.0,
            max_delay: Duration::from_secs(30),
            jitter: JitterPolicy::None,
            retryable: vec![429, 502, 503],
        }
    }
}

impl RetryPolicy {
    /// Returns the attempt budget, clamped to a minimum of 1.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// True if the given HTTP status should be treated as transient.
    #[inline]
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable.contains(&status)
    }

    /// Computes the delay to sleep after the given attempt (1-indexed).
    ///
    /// The base delay is `delay × growth^(attempt-1)`, clamped to
    /// [`RetryPolicy::max_delay`]. Jitter is applied to the clamped base, but
    /// the result is **never** fed back into subsequent calculations — each
    /// attempt derives its base independently.
    ///
    /// # Notes
    /// - If `growth` equals 1.0, the delay stays constant at `delay`.
    /// - If `growth` is greater than 1.0, delays grow exponentially up to
    ///   `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let max_secs = self.max_delay.as_secs_f64();
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let unclamped_secs = self.delay.as_secs_f64() * self.growth.powi(exp);

        let base =
            if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
                self.max_delay
            } else {
                Duration::from_secs_f64(unclamped_secs)
            };

        self.jitter.apply(base)
    }
}
