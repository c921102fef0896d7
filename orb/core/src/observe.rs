//! Snapshot Publication
//!
//! Controllers publish every new state as an immutable `Arc` snapshot. The
//! rendering layer either asks for the current one or subscribes and is woken
//! on each publish; it never holds a mutable reference.

use std::sync::Arc;

use tokio::sync::watch;

/// Latest-value cell holding a controller's current snapshot
#[derive(Debug)]
pub struct SnapshotCell<T> {
    tx: watch::Sender<Arc<T>>,
}

impl<T> SnapshotCell<T> {
    /// Create a cell holding `initial`
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Current snapshot
    #[must_use]
    pub fn current(&self) -> Arc<T> {
        Arc::clone(&self.tx.borrow())
    }

    /// Receiver that observes every future publish
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.tx.subscribe()
    }

    /// Replace the current snapshot and wake subscribers
    pub fn publish(&self, next: T) -> Arc<T> {
        let next = Arc::new(next);
        self.tx.send_replace(Arc::clone(&next));
        next
    }
}
