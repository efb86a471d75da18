//! # LogWriter — simple event logger
//!
//! A minimal subscriber that forwards incoming [`Event`]s to the `log`
//! crate. Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [poll-started] source="dexscreener"
//! [fetch-starting] source="dexscreener" attempt=1
//! [fetch-failed] source="dexscreener" attempt=1 status=503 reason="HTTP 503"
//! [retry-scheduled] source="dexscreener" after_attempt=1 delay_ms=3000
//! [published] source="dexscreener" value=1.2345 changed=true
//! [poll-stopped] source="dexscreener"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::PollStarted => {
                log::info!("[poll-started] source={:?}", e.source);
            }
            EventKind::PollStopped => {
                log::info!("[poll-stopped] source={:?}", e.source);
            }
            EventKind::FetchStarting => {
                log::debug!(
                    "[fetch-starting] source={:?} attempt={:?}",
                    e.source,
                    e.attempt
                );
            }
            EventKind::FetchFailed => {
                log::warn!(
                    "[fetch-failed] source={:?} attempt={:?} status={:?} reason={:?}",
                    e.source,
                    e.attempt,
                    e.status,
                    e.reason
                );
            }
            EventKind::RetryScheduled => {
                log::info!(
                    "[retry-scheduled] source={:?} after_attempt={:?} delay_ms={:?}",
                    e.source,
                    e.attempt,
                    e.delay_ms
                );
            }
            EventKind::QuotePublished => {
                log::info!(
                    "[published] source={:?} value={:?} changed={:?}",
                    e.source,
                    e.value,
                    e.changed
                );
            }
            EventKind::SourceUnconfigured => {
                log::warn!("[unconfigured] source={:?}", e.source);
            }
            EventKind::SubscriberOverflow => {
                log::warn!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.source,
                    e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                log::error!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.source.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
