//! Bounded, self-expiring registry of job status notifications.
//!
//! The registry is the only state concurrent jobs share. It holds at
//! most [`MAX_NOTIFICATIONS`] entries, newest first; inserting beyond
//! capacity evicts the oldest entry regardless of its status (recency
//! over completeness). Terminal entries are immutable and removed a
//! fixed delay after the transition.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use snapbooth_core::types::{JobId, Notification, NotificationStatus};

/// Maximum number of notifications surfaced at once.
pub const MAX_NOTIFICATIONS: usize = 5;

/// How long a terminal notification stays visible before removal.
pub const EXPIRE_DELAY: Duration = Duration::from_secs(10);

/// Shared handle to the notification collection.
///
/// Cheaply cloneable; the collection is guarded by a mutex because jobs
/// run on a multi-threaded runtime. Each job only ever writes its own
/// entry, so contention is limited to the short lock window.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry at the front, evicting the oldest beyond
    /// capacity.
    pub fn add(&self, notification: Notification) {
        let mut entries = self.inner.lock().expect("notification lock poisoned");
        entries.insert(0, notification);
        entries.truncate(MAX_NOTIFICATIONS);
    }

    /// Move an entry to a new status.
    ///
    /// Entries that already reached a terminal status are never
    /// mutated again; late or duplicate transitions are dropped.
    /// Updating an id that was evicted or expired is a no-op.
    pub fn update(&self, id: JobId, status: NotificationStatus) {
        let mut entries = self.inner.lock().expect("notification lock poisoned");
        if let Some(entry) = entries.iter_mut().find(|n| n.id == id) {
            if entry.status.is_terminal() {
                tracing::debug!(%id, ?status, "Ignoring update to terminal notification");
                return;
            }
            entry.status = status;
        }
    }

    /// Remove an entry immediately.
    pub fn remove(&self, id: JobId) {
        let mut entries = self.inner.lock().expect("notification lock poisoned");
        entries.retain(|n| n.id != id);
    }

    /// Remove an entry after `delay`, without blocking the caller.
    pub fn schedule_expire(&self, id: JobId, delay: Duration) {
        let center = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            center.remove(id);
        });
    }

    /// Snapshot of all entries, newest first.
    pub fn list(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .expect("notification lock poisoned")
            .clone()
    }
}
