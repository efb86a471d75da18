//! # Bounded retry loop over a transport.
//!
//! [`fetch_with_retry`] performs one logical read with a bounded attempt
//! budget, publishing fetch lifecycle events to the session bus.
//!
//! ## Attempt flow
//! ```text
//! for attempt in 1..=max_attempts {
//!   ├─► publish FetchStarting{ attempt }
//!   ├─► transport.get(url)          (exactly one read)
//!   │       │
//!   │       ├─ 2xx               ─► return response
//!   │       ├─ retryable status  ─► transient (even if a body is present)
//!   │       ├─ other non-2xx     ─► FatalHttp, exit immediately
//!   │       └─ transport error   ─► transient (connect/DNS/timeout)
//!   │
//!   └─► if transient and attempts remain:
//!         ├─► publish RetryScheduled{ delay, attempt }
//!         └─► sleep(policy.delay_for(attempt))   (cancellable)
//! }
//! └─► Exhausted, carrying the last transient failure
//! ```
//!
//! ## Rules
//! - Exactly one transport read per attempt; no implicit double-fetch.
//! - The delay occurs strictly between attempts: never before the first,
//!   never after the last.
//! - A single non-retryable failure short-circuits regardless of remaining
//!   budget — retry protection is for rate-limit/overload signals, not for
//!   permanently broken endpoints.
//! - Cancellation during the backoff sleep aborts the fetch with
//!   [`FetchError::Canceled`]; an in-flight read is not aborted (its own
//!   fixed timeout bounds it).

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::RetryPolicy;
use crate::source::transport::{HttpResponse, Transport};

/// Performs one logical read: up to `policy.attempts()` transport reads with
/// cancellable inter-attempt delays.
///
/// Returns the first successful response, or:
/// - [`FetchError::FatalHttp`] on the first non-retryable failing status;
/// - [`FetchError::Exhausted`] after spending the whole budget on transient
///   failures;
/// - [`FetchError::Canceled`] if `token` fires during a backoff sleep.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    url: &str,
    policy: &RetryPolicy,
    token: &CancellationToken,
    bus: &Bus,
    source: &str,
) -> Result<HttpResponse, FetchError> {
    let attempts = policy.attempts();
    let mut last_transient = String::new();

    for attempt in 1..=attempts {
        bus.publish(
            Event::new(EventKind::FetchStarting)
                .with_source(source)
                .with_attempt(attempt),
        );

        match transport.get(url).await {
            Ok(resp) if resp.is_success() => return Ok(resp),
            Ok(resp) if policy.is_retryable_status(resp.status) => {
                let reason = format!("HTTP {}", resp.status);
                bus.publish(
                    Event::new(EventKind::FetchFailed)
                        .with_source(source)
                        .with_attempt(attempt)
                        .with_status(resp.status)
                        .with_reason(reason.clone()),
                );
                last_transient = reason;
            }
            Ok(resp) => {
                bus.publish(
                    Event::new(EventKind::FetchFailed)
                        .with_source(source)
                        .with_attempt(attempt)
                        .with_status(resp.status)
                        .with_reason(format!("HTTP {}", resp.status)),
                );
                return Err(FetchError::FatalHttp {
                    status: resp.status,
                });
            }
            Err(err) => {
                bus.publish(
                    Event::new(EventKind::FetchFailed)
                        .with_source(source)
                        .with_attempt(attempt)
                        .with_reason(err.to_string()),
                );
                last_transient = err.to_string();
            }
        }

        if attempt < attempts {
            let delay = policy.delay_for(attempt);
            bus.publish(
                Event::new(EventKind::RetryScheduled)
                    .with_source(source)
                    .with_attempt(attempt)
                    .with_delay(delay)
                    .with_reason(last_transient.clone()),
            );

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                biased;
                _ = token.cancelled() => return Err(FetchError::Canceled),
                _ = &mut sleep => {}
            }
        }
    }

    Err(FetchError::Exhausted {
        attempts,
        last: last_transient,
    })
}
