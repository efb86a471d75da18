//! # PollSession: the serialized polling loop.
//!
//! Drives one [`QuoteSource`] on a recurring timer with:
//! - an immediate first fetch, then one fetch per interval,
//! - change detection via [`StalenessGate`],
//! - publication guarded by the session's cancellation token,
//! - event fan-out to subscribers through the [`Bus`].
//!
//! ## Loop flow
//! ```text
//! PollSession::spawn()
//!
//! loop {
//!   ├─► wait for tick (cancellable; first tick fires immediately)
//!   ├─► source.fetch(ctx)            (retries happen inside the source)
//!   ├─► changed = gate.evaluate(last_published, outcome)
//!   ├─► if changed and a transition hold is configured: sleep(hold) (cancellable)
//!   ├─► if token cancelled: discard result, exit — no notification,
//!   │                       no state mutation
//!   └─► else: last_published = snapshot
//!             publish QuotePublished to bus + watch channel
//! }
//! ```
//!
//! ## Rules
//! - Ticks are **serialized**: the loop awaits each fetch before the next
//!   tick, and `MissedTickBehavior::Delay` pushes back ticks a slow fetch
//!   overran. Two fetches for the same session never run concurrently, so
//!   there is no last-writer-wins ambiguity between overlapping reads.
//! - The cancellation token is the session's lifecycle guard. It is checked
//!   immediately before the state mutation + publish step; a fetch that
//!   completes after `stop()` is discarded there.
//! - Fetch failures are published as tagged outcomes, not raised: the
//!   subscriber sees `Err(kind)` with an absent value, never an exception.
//! - `last_published` is owned exclusively by this loop; nothing else
//!   mutates it.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::poller::config::PollerConfig;
use crate::poller::handle::PollHandle;
use crate::quotes::{QuoteSnapshot, StalenessGate, Update};
use crate::source::{FetchContext, SourceRef};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Owns one source and the machinery to poll it.
///
/// ## Example
/// ```no_run
/// use pricevisor::{DexConfig, DexSource, PollSession, PollerConfig};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let source = Arc::new(DexSource::new(DexConfig::for_contract(
///         "0x50f88fe97f72cd3e75b9eb4f747f59bceba80d59",
///     )));
///     let handle = PollSession::new(PollerConfig::default(), source, Vec::new()).spawn();
///
///     let mut updates = handle.updates();
///     while updates.changed().await.is_ok() {
///         if let Some(update) = updates.borrow().clone() {
///             println!("price={:?} changed={}", update.value(), update.changed);
///         }
///     }
/// }
/// ```
pub struct PollSession {
    cfg: PollerConfig,
    source: SourceRef,
    bus: Bus,
    subs: Arc<SubscriberSet>,
}

impl PollSession {
    /// Creates a session over the given source with the provided subscribers.
    pub fn new(
        cfg: PollerConfig,
        source: SourceRef,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let subs = Arc::new(SubscriberSet::new(subscribers));
        Self {
            cfg,
            source,
            bus,
            subs,
        }
    }

    /// Spawns the polling loop and returns its handle.
    ///
    /// The first fetch happens immediately; teardown goes through
    /// [`PollHandle::stop`](crate::PollHandle::stop).
    pub fn spawn(self) -> PollHandle {
        let grace = self.cfg.grace;
        let token = CancellationToken::new();
        let (tx, rx) = watch::channel(None);

        self.subscriber_listener();

        let session_loop = SessionLoop {
            cfg: self.cfg,
            source: self.source,
            bus: self.bus,
            gate: StalenessGate,
            updates: tx,
        };
        let join = tokio::spawn(session_loop.run(token.clone()));

        PollHandle::new(token, join, rx, grace)
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget). Exits when the last bus sender is dropped.
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }
}

/// The loop half of a session: everything the spawned task owns.
struct SessionLoop {
    cfg: PollerConfig,
    source: SourceRef,
    bus: Bus,
    gate: StalenessGate,
    updates: watch::Sender<Option<Update>>,
}

impl SessionLoop {
    /// Runs until the token is cancelled.
    ///
    /// ### Cancellation semantics
    /// The token is checked at safe points: the tick wait, the transition
    /// hold, and immediately before the publish step. The network read
    /// itself is not raced against the token (its own fixed per-attempt
    /// timeout bounds it), so a read started just before teardown may
    /// complete afterwards; its result is then discarded.
    async fn run(self, token: CancellationToken) {
        self.bus
            .publish(Event::new(EventKind::PollStarted).with_source(self.source.name()));

        let mut last_published: Option<QuoteSnapshot> = None;
        let mut interval = time::interval(self.cfg.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {}
            }

            let ctx = FetchContext {
                token: token.clone(),
                bus: self.bus.clone(),
                retry: self.cfg.retry.clone(),
            };
            let outcome = self.source.fetch(ctx).await;

            let snapshot = match &outcome {
                Ok(snap) => snap.clone(),
                Err(_) => QuoteSnapshot::empty(),
            };
            let changed = self.gate.evaluate(last_published.as_ref(), &snapshot);

            if changed {
                if let Some(hold) = self.cfg.transition_hold() {
                    let sleep = time::sleep(hold);
                    tokio::pin!(sleep);
                    tokio::select! {
                        _ = &mut sleep => {}
                        _ = token.cancelled() => break,
                    }
                }
            }

            // Lifecycle guard: a fetch that completed after teardown is
            // discarded. No notification, no state mutation.
            if token.is_cancelled() {
                break;
            }

            last_published = Some(snapshot);
            self.publish(outcome, changed);
        }

        self.bus
            .publish(Event::new(EventKind::PollStopped).with_source(self.source.name()));
    }

    fn publish(&self, outcome: Result<QuoteSnapshot, FetchError>, changed: bool) {
        let mut ev = Event::new(EventKind::QuotePublished)
            .with_source(self.source.name())
            .with_changed(changed);
        match &outcome {
            Ok(snap) => {
                if let Some(value) = snap.value {
                    ev = ev.with_value(value);
                }
            }
            Err(err) => {
                ev = ev.with_reason(err.as_label());
            }
        }
        self.bus.publish(ev);

        let _ = self.updates.send(Some(Update::new(outcome, changed)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFn;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn fast_cfg() -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(10),
            ..PollerConfig::default()
        }
    }

    fn sequence_source(values: &'static [f64]) -> SourceRef {
        let index = Arc::new(AtomicUsize::new(0));
        SourceFn::arc("seq", move |_ctx: FetchContext| {
            let i = index.fetch_add(1, Ordering::SeqCst);
            async move {
                let v = values[i.min(values.len() - 1)];
                Ok(QuoteSnapshot::new(v, "seq"))
            }
        })
    }

    async fn next_update(rx: &mut watch::Receiver<Option<Update>>) -> Update {
        rx.changed().await.expect("session alive");
        rx.borrow_and_update().clone().expect("published update")
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_is_immediate() {
        let handle = PollSession::new(fast_cfg(), sequence_source(&[42.0]), Vec::new()).spawn();
        let mut rx = handle.updates();

        let started = time::Instant::now();
        let update = next_update(&mut rx).await;
        assert_eq!(update.value(), Some(42.0));
        assert!(update.changed);
        assert_eq!(started.elapsed(), Duration::ZERO);

        handle.stop().await.expect("clean stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_changed_flags_follow_value_transitions() {
        // 100, 100, 150 → changed on ticks 1 and 3 only.
        let handle =
            PollSession::new(fast_cfg(), sequence_source(&[100.0, 100.0, 150.0]), Vec::new())
                .spawn();
        let mut rx = handle.updates();

        let mut seen = Vec::new();
        for _ in 0..3 {
            let update = next_update(&mut rx).await;
            seen.push((update.value(), update.changed));
        }
        assert_eq!(
            seen,
            vec![
                (Some(100.0), true),
                (Some(100.0), false),
                (Some(150.0), true),
            ]
        );

        handle.stop().await.expect("clean stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_publish_tagged_outcome() {
        let source = SourceFn::arc("failing", |_ctx: FetchContext| async move {
            Err::<QuoteSnapshot, _>(FetchError::FatalHttp { status: 404 })
        });
        let handle = PollSession::new(fast_cfg(), source, Vec::new()).spawn();
        let mut rx = handle.updates();

        let first = next_update(&mut rx).await;
        assert_eq!(first.value(), None);
        assert!(first.changed, "first observation is a transition");
        assert_eq!(
            first.outcome.unwrap_err(),
            FetchError::FatalHttp { status: 404 }
        );

        // Absent never equals absent: the next failed poll is also a transition.
        let second = next_update(&mut rx).await;
        assert!(second.changed);

        handle.stop().await.expect("clean stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_result_of_inflight_fetch() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let source = SourceFn::arc("held", {
            let entered = Arc::clone(&entered);
            let release = Arc::clone(&release);
            move |_ctx: FetchContext| {
                let entered = Arc::clone(&entered);
                let release = Arc::clone(&release);
                async move {
                    entered.notify_one();
                    release.notified().await;
                    Ok(QuoteSnapshot::new(42.0, "held"))
                }
            }
        });

        let handle = PollSession::new(fast_cfg(), source, Vec::new()).spawn();
        let rx = handle.updates();

        // Wait until the fetch is in flight, then tear down around it.
        entered.notified().await;
        handle.cancel();
        release.notify_one();

        handle.stop().await.expect("loop drains after release");
        assert!(
            rx.borrow().is_none(),
            "result completed after stop must not be published"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_hold_applies_to_changed_updates_only() {
        let cfg = PollerConfig {
            transition_delay: Duration::from_millis(800),
            ..fast_cfg()
        };
        let handle =
            PollSession::new(cfg, sequence_source(&[100.0, 100.0]), Vec::new()).spawn();
        let mut rx = handle.updates();

        let started = time::Instant::now();
        let first = next_update(&mut rx).await;
        assert!(first.changed);
        assert_eq!(started.elapsed(), Duration::from_millis(800));

        // Unchanged update publishes on the tick, without the hold.
        let second = next_update(&mut rx).await;
        assert!(!second.changed);
        assert_eq!(started.elapsed(), Duration::from_secs(10));

        handle.stop().await.expect("clean stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_reports_liveness() {
        let handle = PollSession::new(fast_cfg(), sequence_source(&[1.0]), Vec::new()).spawn();
        assert!(handle.is_active());
        handle.cancel();
        assert!(!handle.is_active());
        handle.stop().await.expect("clean stop");
    }

    struct Recorder {
        kinds: Mutex<Vec<EventKind>>,
        published: Notify,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
            if event.kind == EventKind::QuotePublished {
                self.published.notify_one();
            }
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_observe_session_lifecycle() {
        let recorder = Arc::new(Recorder {
            kinds: Mutex::new(Vec::new()),
            published: Notify::new(),
        });
        let handle = PollSession::new(
            fast_cfg(),
            sequence_source(&[7.0]),
            vec![Arc::clone(&recorder) as Arc<dyn Subscribe>],
        )
        .spawn();

        recorder.published.notified().await;
        handle.stop().await.expect("clean stop");

        let kinds = recorder.kinds.lock().unwrap().clone();
        assert!(kinds.contains(&EventKind::PollStarted));
        assert!(kinds.contains(&EventKind::QuotePublished));
    }
}
