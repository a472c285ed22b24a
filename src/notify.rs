//! Toast notifications.
//!
//! [`ToastBus`] is the process-wide channel any component can publish to.
//! It keeps a bounded queue of visible toasts that expire after a fixed TTL
//! and fans every published toast out to broadcast subscribers.
//! [`Notifier`] maps upload pipeline events onto toasts.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

const BROADCAST_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Destructive,
    Celebration,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

struct BusInner {
    queue: Mutex<VecDeque<Toast>>,
    capacity: usize,
    ttl: Duration,
    next_id: AtomicU64,
    sender: broadcast::Sender<Toast>,
}

#[derive(Clone)]
pub struct ToastBus {
    inner: Arc<BusInner>,
}

impl ToastBus {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Arc::new(BusInner {
                queue: Mutex::new(VecDeque::with_capacity(capacity)),
                capacity: capacity.max(1),
                ttl,
                next_id: AtomicU64::new(1),
                sender,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.inner.sender.subscribe()
    }

    pub fn publish(
        &self,
        kind: ToastKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> u64 {
        self.publish_at(kind, title, description, Instant::now())
    }

    pub fn publish_at(
        &self,
        kind: ToastKind,
        title: impl Into<String>,
        description: impl Into<String>,
        now: Instant,
    ) -> u64 {
        let toast = Toast {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            title: title.into(),
            description: description.into(),
            kind,
            created_at: now,
        };
        let id = toast.id;
        tracing::debug!(id, kind = ?toast.kind, title = %toast.title, "toast published");

        {
            let mut queue = self.lock();
            Self::prune(&mut queue, now, self.inner.ttl);
            while queue.len() >= self.inner.capacity {
                queue.pop_front();
            }
            queue.push_back(toast.clone());
        }

        // No subscribers is fine; the queue still holds the toast.
        let _ = self.inner.sender.send(toast);
        id
    }

    /// Toasts still within their TTL, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.visible_at(Instant::now())
    }

    pub fn visible_at(&self, now: Instant) -> Vec<Toast> {
        let mut queue = self.lock();
        Self::prune(&mut queue, now, self.inner.ttl);
        queue.iter().cloned().collect()
    }

    pub fn dismiss(&self, id: u64) {
        self.lock().retain(|t| t.id != id);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn prune(queue: &mut VecDeque<Toast>, now: Instant, ttl: Duration) {
        queue.retain(|t| !t.is_expired(now, ttl));
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.inner
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Events the upload pipeline reports to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Rejected { file: String, reason: String },
    Duplicate { file: String },
    Succeeded { file: String },
    Errored { file: String, message: String },
    Removed,
    Cleared,
}

#[derive(Clone)]
pub struct Notifier {
    bus: ToastBus,
}

impl Notifier {
    pub fn new(bus: ToastBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &ToastBus {
        &self.bus
    }

    pub fn notify(&self, notice: Notice) {
        match notice {
            Notice::Rejected { file, reason } => {
                self.bus.publish(
                    ToastKind::Destructive,
                    format!("Validation error: {}", file),
                    reason,
                );
            }
            Notice::Duplicate { file } => {
                self.bus.publish(
                    ToastKind::Destructive,
                    "Duplicate file",
                    format!("{} has already been added.", file),
                );
            }
            Notice::Succeeded { file } => {
                self.bus.publish(
                    ToastKind::Celebration,
                    "Upload complete",
                    format!("{} was uploaded successfully.", file),
                );
            }
            Notice::Errored { file, message } => {
                self.bus.publish(
                    ToastKind::Destructive,
                    format!("Upload failed: {}", file),
                    message,
                );
            }
            Notice::Removed => {
                self.bus.publish(
                    ToastKind::Info,
                    "File removed",
                    "The file was removed from the list.",
                );
            }
            Notice::Cleared => {
                self.bus.publish(
                    ToastKind::Info,
                    "List cleared",
                    "All files were removed.",
                );
            }
        }
    }

    pub fn info(&self, title: impl Into<String>, description: impl Into<String>) {
        self.bus.publish(ToastKind::Info, title, description);
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.bus.publish(ToastKind::Success, title, description);
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.bus.publish(ToastKind::Destructive, title, description);
    }
}
