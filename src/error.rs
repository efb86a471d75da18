//! Error types used by the pricevisor runtime and fetch pipeline.
//!
//! This module defines two main error enums:
//!
//! - [`FetchError`] — failures raised while retrieving and decoding one quote.
//! - [`PollError`] — failures raised by the polling session itself.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics and additional utilities such as [`FetchError::is_retryable`].

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while fetching and decoding a quote.
///
/// The split between retryable and non-retryable variants drives the attempt
/// loop in [`fetch_with_retry`](crate::source::fetch_with_retry): transient
/// failures consume attempt budget, everything else short-circuits.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Network-level failure (connect, DNS, per-attempt timeout) or a
    /// rate-limit/overload HTTP status. Retried up to the attempt budget.
    #[error("transient failure: {reason}")]
    Transient {
        /// What went wrong on this attempt.
        reason: String,
    },

    /// Any other non-2xx HTTP status. Never retried: a permanently broken
    /// endpoint does not get hammered.
    #[error("fatal HTTP status {status}")]
    FatalHttp {
        /// The failing status code.
        status: u16,
    },

    /// The whole attempt budget was spent on transient failures.
    #[error("exhausted {attempts} attempts; last: {last}")]
    Exhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The last transient failure observed, for diagnostics.
        last: String,
    },

    /// No contract address (or base URL) was configured. This is a
    /// recognized empty state, produced without any network call.
    #[error("source not configured")]
    Unconfigured,

    /// The response body did not parse or did not match the expected shape.
    #[error("decode failed: {reason}")]
    Decode {
        /// Parser or shape error description.
        reason: String,
    },

    /// The owning session was torn down while a retry delay was pending.
    #[error("fetch canceled")]
    Canceled,
}

impl FetchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pricevisor::FetchError;
    ///
    /// let err = FetchError::FatalHttp { status: 404 };
    /// assert_eq!(err.as_label(), "fetch_fatal_http");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FetchError::Transient { .. } => "fetch_transient",
            FetchError::FatalHttp { .. } => "fetch_fatal_http",
            FetchError::Exhausted { .. } => "fetch_exhausted",
            FetchError::Unconfigured => "fetch_unconfigured",
            FetchError::Decode { .. } => "fetch_decode",
            FetchError::Canceled => "fetch_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            FetchError::Transient { reason } => format!("transient: {reason}"),
            FetchError::FatalHttp { status } => format!("fatal http: {status}"),
            FetchError::Exhausted { attempts, last } => {
                format!("exhausted after {attempts} attempts; last: {last}")
            }
            FetchError::Unconfigured => "source not configured".to_string(),
            FetchError::Decode { reason } => format!("decode: {reason}"),
            FetchError::Canceled => "canceled".to_string(),
        }
    }

    /// Indicates whether another attempt may succeed.
    ///
    /// Returns `true` only for [`FetchError::Transient`]; everything else is
    /// terminal for the current fetch.
    ///
    /// # Example
    /// ```
    /// use pricevisor::FetchError;
    ///
    /// let retryable = FetchError::Transient { reason: "503".into() };
    /// assert!(retryable.is_retryable());
    ///
    /// let fatal = FetchError::FatalHttp { status: 404 };
    /// assert!(!fatal.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }
}

/// # Errors produced by the polling session runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PollError {
    /// `stop()` waited out its grace period but the session loop was still
    /// running (an in-flight read is bounded only by its own timeout).
    #[error("stop grace {grace:?} exceeded; session still draining")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },
}

impl PollError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PollError::GraceExceeded { .. } => "poll_grace_exceeded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(FetchError::Transient { reason: "x".into() }.is_retryable());
        assert!(!FetchError::FatalHttp { status: 500 }.is_retryable());
        assert!(
            !FetchError::Exhausted {
                attempts: 3,
                last: "x".into()
            }
            .is_retryable()
        );
        assert!(!FetchError::Unconfigured.is_retryable());
        assert!(!FetchError::Decode { reason: "x".into() }.is_retryable());
        assert!(!FetchError::Canceled.is_retryable());
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            FetchError::Transient { reason: "x".into() }.as_label(),
            "fetch_transient"
        );
        assert_eq!(FetchError::Unconfigured.as_label(), "fetch_unconfigured");
        assert_eq!(
            PollError::GraceExceeded {
                grace: Duration::from_secs(1)
            }
            .as_label(),
            "poll_grace_exceeded"
        );
    }
}
