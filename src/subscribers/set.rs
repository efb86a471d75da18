//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`](crate::events::Event) to
//! multiple subscribers **without awaiting** their processing. Every
//! subscriber owns a bounded lane (queue + worker task); a slow or broken
//! subscriber only ever loses its own events.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (lane order).
//! - Panics inside subscribers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on lane overflow (the event is dropped for that subscriber).
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [lane S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [lane S2] ─► worker S2 ─► on_event()
//!        └────────────────► [lane SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Subscribe;

/// One subscriber's bounded queue plus its name for drop reports.
struct Lane {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

impl Lane {
    /// Builds the lane and spawns its worker.
    fn open(sub: Arc<dyn Subscribe>) -> (Self, JoinHandle<()>) {
        let name = sub.name();
        let (tx, rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
        let worker = tokio::spawn(Self::drain(sub, rx));
        (Self { name, tx }, worker)
    }

    /// Worker loop: process events in FIFO order, isolating panics.
    async fn drain(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>) {
        while let Some(ev) = rx.recv().await {
            let handled = std::panic::AssertUnwindSafe(sub.on_event(ev.as_ref()))
                .catch_unwind()
                .await;
            if let Err(panic_err) = handled {
                log::error!("subscriber '{}' panicked: {:?}", sub.name(), panic_err);
            }
        }
    }

    /// Enqueues one event, reporting (not retrying) a full or closed lane.
    fn offer(&self, ev: Arc<Event>) {
        match self.tx.try_send(ev) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("subscriber '{}' dropped event: queue full", self.name);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::warn!("subscriber '{}' dropped event: worker closed", self.name);
            }
        }
    }
}

/// Composite fan-out with per-subscriber bounded lanes and worker tasks.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let (lanes, workers) = subs.into_iter().map(Lane::open).unzip();
        Self { lanes, workers }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for lane in &self.lanes {
            lane.offer(Arc::clone(&ev));
        }
    }

    /// Graceful shutdown: close all lanes and await worker completion.
    pub async fn shutdown(self) {
        drop(self.lanes);
        for worker in self.workers {
            let _ = worker.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(vec![
            Arc::new(Counter(a.clone())) as Arc<dyn Subscribe>,
            Arc::new(Counter(b.clone())) as Arc<dyn Subscribe>,
        ]);
        assert_eq!(set.len(), 2);

        set.emit(&Event::new(EventKind::QuotePublished));
        set.emit(&Event::new(EventKind::QuotePublished));
        set.shutdown().await;

        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[tokio::test]
    async fn test_panicking_subscriber_does_not_poison_others() {
        init_logs();
        let count = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(vec![
            Arc::new(Panicker) as Arc<dyn Subscribe>,
            Arc::new(Counter(count.clone())) as Arc<dyn Subscribe>,
        ]);

        set.emit(&Event::new(EventKind::FetchFailed));
        set.emit(&Event::new(EventKind::FetchFailed));
        set.shutdown().await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_set_is_a_no_op() {
        let set = SubscriberSet::new(Vec::new());
        assert!(set.is_empty());
        set.emit(&Event::new(EventKind::PollStarted));
        set.shutdown().await;
    }
}
