//! Thought Log
//!
//! Newest-first note log with optimistic writes.
//!
//! `save()` puts the entry at the top of the log before the kernel has seen
//! it. Whatever the kernel answers afterwards, the entry stays: a failure only
//! sets the error line, and degraded mode tags the entry as local-only.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use im::Vector;
use tokio::sync::watch;

use crate::backend::{KernelBackend, ThoughtAck, ThoughtRequest, DEGRADED_STATUS};
use crate::dispatch::{Dispatcher, RequestId, Settled};
use crate::error::KernelError;
use crate::observe::SnapshotCell;

/// Notice shown when the kernel has no brain configured for thoughts
pub const SAVED_LOCALLY: &str = "Saved locally (backend not configured).";

/// One saved thought
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThoughtEntry {
    /// Trimmed thought text
    pub text: String,
    /// When the thought was saved locally
    pub created_at: DateTime<Utc>,
    /// The kernel acknowledged the write but did not store it
    pub local_only: bool,
}

impl ThoughtEntry {
    /// Create an entry stamped with the current time
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
            local_only: false,
        }
    }

    /// Copy of this entry tagged as local-only
    #[must_use]
    pub fn into_local_only(self) -> Self {
        Self {
            local_only: true,
            ..self
        }
    }
}

/// Severity of the notice line under the log
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational, e.g. degraded mode
    Info,
    /// A failed write
    Error,
}

/// Immutable view of the thought log
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThoughtSnapshot {
    /// Entries, newest first
    pub entries: Vector<Arc<ThoughtEntry>>,
    /// Text in the editor
    pub draft: String,
    /// Notice text; empty means none
    pub error_message: String,
    /// Severity of `error_message` when it is set
    pub notice_level: Option<NoticeLevel>,
    /// Set by a save, cleared by the next resolved write
    pub saving: bool,
}

impl ThoughtSnapshot {
    /// Whether the saving indicator is on
    #[must_use]
    pub fn saving(&self) -> bool {
        self.saving
    }

    /// Whether a notice is showing
    #[must_use]
    pub fn has_notice(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Replace the editor text
    #[must_use]
    pub fn with_draft(&self, text: impl Into<String>) -> Self {
        Self {
            draft: text.into(),
            ..self.clone()
        }
    }

    /// Prepend the draft as a new entry
    ///
    /// Returns `None` for a blank draft, otherwise the new snapshot and the
    /// entry that was inserted.
    #[must_use]
    pub fn with_saved_draft(&self) -> Option<(Self, Arc<ThoughtEntry>)> {
        let text = self.draft.trim();
        if text.is_empty() {
            return None;
        }
        let entry = Arc::new(ThoughtEntry::new(text));

        let mut next = self.clone();
        next.entries.push_front(Arc::clone(&entry));
        next.draft.clear();
        next.error_message.clear();
        next.notice_level = None;
        next.saving = true;
        Some((next, entry))
    }

    /// Resolve a write, leaving the entries as they are
    #[must_use]
    pub fn with_write_settled(&self) -> Self {
        Self {
            saving: false,
            ..self.clone()
        }
    }

    /// Resolve a write and show a notice
    #[must_use]
    pub fn with_write_failed(&self, level: NoticeLevel, message: impl Into<String>) -> Self {
        let mut next = self.with_write_settled();
        next.error_message = message.into();
        next.notice_level = Some(level);
        next
    }

    /// Replace `entry` in place with a local-only copy
    ///
    /// The entry is found by identity, so later prepends do not confuse it
    /// with another entry at the same position. Unknown entries are ignored.
    #[must_use]
    pub fn with_local_only(&self, entry: &Arc<ThoughtEntry>) -> Self {
        let mut next = self.clone();
        if let Some(index) = next.entries.iter().position(|e| Arc::ptr_eq(e, entry)) {
            next.entries[index] = Arc::new(entry.as_ref().clone().into_local_only());
        }
        next
    }
}

/// Controller for the thought log
pub struct ThoughtLogController<B: KernelBackend + 'static> {
    backend: Arc<B>,
    degraded_status: String,
    cell: SnapshotCell<ThoughtSnapshot>,
    dispatcher: Dispatcher<ThoughtAck>,
    pending: HashMap<RequestId, Arc<ThoughtEntry>>,
}

impl<B: KernelBackend + 'static> ThoughtLogController<B> {
    /// Create a controller with an empty log
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            degraded_status: DEGRADED_STATUS.to_string(),
            cell: SnapshotCell::new(ThoughtSnapshot::default()),
            dispatcher: Dispatcher::new(),
            pending: HashMap::new(),
        }
    }

    /// Use a different status value to detect degraded mode
    #[must_use]
    pub fn with_degraded_status(mut self, status: impl Into<String>) -> Self {
        self.degraded_status = status.into();
        self
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<ThoughtSnapshot> {
        self.cell.current()
    }

    /// Observe every future snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<ThoughtSnapshot>> {
        self.cell.subscribe()
    }

    /// Writes issued and not yet applied
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Replace the editor text
    pub fn set_draft(&mut self, text: impl Into<String>) -> Arc<ThoughtSnapshot> {
        let next = self.cell.current().with_draft(text);
        self.cell.publish(next)
    }

    /// Save the draft
    ///
    /// The entry is prepended and the draft cleared before the kernel is
    /// contacted. Blank drafts are a no-op and return `None`. Must be called
    /// from within a Tokio runtime.
    pub fn save(&mut self) -> Option<(RequestId, Arc<ThoughtSnapshot>)> {
        let Some((next, entry)) = self.cell.current().with_saved_draft() else {
            tracing::debug!("Ignoring blank thought");
            return None;
        };
        let snapshot = self.cell.publish(next);

        let backend = Arc::clone(&self.backend);
        let request = ThoughtRequest::new(entry.text.clone());
        let request_id = self
            .dispatcher
            .dispatch(async move { backend.post_thought(&request).await });
        self.pending.insert(request_id, entry);

        tracing::debug!(request = %request_id, "Thought saved locally, syncing");
        Some((request_id, snapshot))
    }

    /// Apply every write result that has already arrived, without waiting
    ///
    /// Returns how many results were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(settled) = self.dispatcher.try_next() {
            self.apply(settled);
            applied += 1;
        }
        applied
    }

    /// Wait for the next write result and apply it
    ///
    /// Returns `false` without waiting when nothing is in flight.
    pub async fn settle_next(&mut self) -> bool {
        match self.dispatcher.next().await {
            Some(settled) => {
                self.apply(settled);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, settled: Settled<ThoughtAck>) {
        let entry = self.pending.remove(&settled.request_id);
        let current = self.cell.current();

        let outcome = settled
            .outcome
            .and_then(|ack| ack.check(&self.degraded_status));

        let next = match outcome {
            Ok(ack) => {
                tracing::info!(request = %settled.request_id, status = %ack.status, "Thought stored");
                current.with_write_settled()
            }
            Err(KernelError::DegradedMode { status }) => {
                tracing::warn!(request = %settled.request_id, status = %status, "Thought kept locally only");
                let tagged = match entry {
                    Some(ref entry) => current.with_local_only(entry),
                    None => current.as_ref().clone(),
                };
                tagged.with_write_failed(NoticeLevel::Info, SAVED_LOCALLY)
            }
            Err(e) => {
                tracing::warn!(request = %settled.request_id, error = %e, "Thought sync failed");
                current.with_write_failed(NoticeLevel::Error, e.to_string())
            }
        };
        self.cell.publish(next);
    }
}
