//! Retry policies.
//!
//! This module groups the knobs that control **how many times** a fetch is
//! attempted, **which** HTTP statuses are worth another attempt, and **how
//! long** to wait between attempts.
//!
//! ## Contents
//! - [`RetryPolicy`] attempt budget, retryable status set, delay schedule
//! - [`JitterPolicy`] randomization strategy to avoid thundering herd
//!
//! ## Quick wiring
//! ```text
//! PollerConfig { retry: RetryPolicy, .. }
//!      └─► source::fetch_with_retry uses:
//!           - retry.max_attempts to bound the loop
//!           - retry.is_retryable_status(code) to classify responses
//!           - retry.delay_for(attempt) to schedule the next attempt
//! ```
//!
//! ## Defaults
//! - `max_attempts = 3`, `delay = 3s` (constant), `retryable = [429, 502, 503]`.
//! - `JitterPolicy::None` by default; consider `Equal` for balanced randomness.

mod jitter;
mod retry;

pub use jitter::JitterPolicy;
pub use retry::RetryPolicy;
