//! # PollHandle: consumer-facing session handle.
//!
//! A [`PollHandle`] is returned by
//! [`PollSession::spawn`](crate::poller::PollSession::spawn) and is the only
//! way to observe or tear down a running session:
//! - [`PollHandle::updates`] - a `watch` receiver holding the latest
//!   published [`Update`] (the value stream);
//! - [`PollHandle::is_active`] - liveness flag;
//! - [`PollHandle::stop`] - cancel and wait for the loop to drain.
//!
//! ## Teardown semantics
//! `stop()` cancels the session token, which permanently prevents any
//! further publication, then waits up to the configured grace for the loop
//! task to exit. An in-flight network read is **not** aborted - its own
//! fixed per-attempt timeout bounds it - but its result is discarded by the
//! token check inside the loop. Dropping the handle without calling `stop()`
//! also cancels the token, so an abandoned session cannot keep publishing.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::PollError;
use crate::quotes::Update;

/// Handle to a running polling session.
pub struct PollHandle {
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
    updates: watch::Receiver<Option<Update>>,
    grace: Duration,
}

impl PollHandle {
    pub(crate) fn new(
        token: CancellationToken,
        join: JoinHandle<()>,
        updates: watch::Receiver<Option<Update>>,
        grace: Duration,
    ) -> Self {
        Self {
            token,
            join: Some(join),
            updates,
            grace,
        }
    }

    /// Returns a receiver tracking the latest published update.
    ///
    /// The receiver starts at `None` (nothing published yet) and then holds
    /// the most recent [`Update`]; intermediate updates may be skipped if the
    /// consumer reads slower than the poll interval.
    pub fn updates(&self) -> watch::Receiver<Option<Update>> {
        self.updates.clone()
    }

    /// Returns the most recently published update, if any.
    pub fn latest(&self) -> Option<Update> {
        self.updates.borrow().clone()
    }

    /// True while the session may still publish.
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
            && self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Cancels the session without waiting for the loop to exit.
    ///
    /// Publication stops immediately and permanently; the loop task drains
    /// on its own. Use [`PollHandle::stop`] to also wait for the drain.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Stops the session: cancels the token and waits up to the configured
    /// grace for the loop to exit.
    ///
    /// Returns [`PollError::GraceExceeded`] if the loop is still draining
    /// when the grace elapses (publication is suppressed either way).
    pub async fn stop(mut self) -> Result<(), PollError> {
        self.token.cancel();
        let Some(join) = self.join.take() else {
            return Ok(());
        };
        match time::timeout(self.grace, join).await {
            Ok(_) => Ok(()),
            Err(_) => Err(PollError::GraceExceeded { grace: self.grace }),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
