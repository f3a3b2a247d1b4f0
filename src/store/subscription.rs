//! Subscriber-side views of the state and event channels.

use tokio::sync::{broadcast, watch};

/// Replay-latest view of a store's published states.
///
/// The first call to [`next`](Self::next) yields the snapshot current at
/// that moment; later calls wait for the next publication. Intermediate
/// snapshots published while the subscriber is busy are skipped, the latest
/// one wins.
#[derive(Debug)]
pub struct StateSubscription<S> {
    rx: watch::Receiver<S>,
    primed: bool,
}

impl<S: Clone> StateSubscription<S> {
    pub(crate) fn new(rx: watch::Receiver<S>) -> Self {
        Self { rx, primed: false }
    }

    /// Next snapshot, or `None` once the store has been disposed.
    pub async fn next(&mut self) -> Option<S> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// The latest snapshot without waiting.
    pub fn latest(&self) -> S {
        self.rx.borrow().clone()
    }
}

/// View of a store's events. Only events emitted after subscribing are seen.
#[derive(Debug)]
pub struct EventSubscription<E> {
    rx: broadcast::Receiver<E>,
}

impl<E: Clone> EventSubscription<E> {
    pub(crate) fn new(rx: broadcast::Receiver<E>) -> Self {
        Self { rx }
    }

    /// Next event, or `None` once the store has been disposed.
    ///
    /// A subscriber that falls behind the channel capacity loses the oldest
    /// events and resumes from the oldest one still buffered.
    pub async fn next(&mut self) -> Option<E> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next buffered event without waiting.
    pub fn try_next(&mut self) -> Option<E> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event subscriber lagged, events dropped");
                }
                Err(_) => return None,
            }
        }
    }
}
