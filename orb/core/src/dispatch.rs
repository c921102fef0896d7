//! Request Dispatch
//!
//! Runs kernel calls off the interaction loop and hands their results back to
//! the controller that issued them.
//!
//! A call is spawned onto the Tokio runtime together with a clone of the
//! completion sender. The owning controller drains completions with
//! [`Dispatcher::try_next`] (never blocks) or [`Dispatcher::next`] (waits for
//! one). Completions come back in the order they settle, not the order they
//! were issued, and nothing is cancelled or superseded.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::error::KernelError;

/// Sequence number of an issued request, unique per controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Raw sequence number
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// A request that has finished, successfully or not
#[derive(Debug)]
pub struct Settled<T> {
    /// Request this result belongs to
    pub request_id: RequestId,
    /// What the kernel call produced
    pub outcome: Result<T, KernelError>,
}

/// Spawns kernel calls and collects their results
#[derive(Debug)]
pub struct Dispatcher<T> {
    tx: mpsc::UnboundedSender<Settled<T>>,
    rx: mpsc::UnboundedReceiver<Settled<T>>,
    in_flight: usize,
    next_id: u64,
}

impl<T: Send + 'static> Dispatcher<T> {
    /// Create a dispatcher with nothing in flight
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            in_flight: 0,
            next_id: 0,
        }
    }

    /// Number of requests issued but not yet drained
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Spawn `call` and return its request id
    ///
    /// Must be called from within a Tokio runtime. A call that panics settles
    /// as a `NetworkFailure` so the in-flight count always drains.
    pub fn dispatch<F>(&mut self, call: F) -> RequestId
    where
        F: Future<Output = Result<T, KernelError>> + Send + 'static,
    {
        let request_id = RequestId(self.next_id);
        self.next_id += 1;
        self.in_flight += 1;

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(call).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => Err(KernelError::NetworkFailure(
                    "request task aborted".to_string(),
                )),
            };
            // receiver lives as long as the controller
            let _ = tx.send(Settled {
                request_id,
                outcome,
            });
        });

        request_id
    }

    /// Take one settled request without waiting
    pub fn try_next(&mut self) -> Option<Settled<T>> {
        if self.in_flight == 0 {
            return None;
        }
        let settled = self.rx.try_recv().ok()?;
        self.in_flight -= 1;
        Some(settled)
    }

    /// Wait for the next settled request
    ///
    /// Returns `None` immediately when nothing is in flight. Cancel safe.
    pub async fn next(&mut self) -> Option<Settled<T>> {
        if self.in_flight == 0 {
            return None;
        }
        let settled = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(settled)
    }
}

impl<T: Send + 'static> Default for Dispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}
