//! Change events driving cache invalidation.
//!
//! Write operations publish a typed event instead of attaching observers
//! to model classes; the consumer drains the queue and folds each event
//! through the static dependency table.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;
use uuid::Uuid;

use super::keys::EntityKind;
use super::lock::queue_guard;

/// Model lifecycle changes that trigger invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Created(EntityKind),
    Updated(EntityKind),
    Deleted(EntityKind),
    /// Populate the cache after startup.
    WarmupOnStartup,
}

impl EventKind {
    /// The model the event concerns, if any.
    pub fn entity(&self) -> Option<EntityKind> {
        match self {
            EventKind::Created(entity) | EventKind::Updated(entity) | EventKind::Deleted(entity) => {
                Some(*entity)
            }
            EventKind::WarmupOnStartup => None,
        }
    }
}

/// One published change, stamped for idempotency and ordering.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    /// Dedup handle; a redelivered event is processed once per batch.
    pub id: Uuid,
    /// Position in this process's publish order.
    pub epoch: u64,
    pub kind: EventKind,
}

/// FIFO queue of pending events.
///
/// Contention is low (writes are rare next to reads, and the consumer
/// drains in batches), so a plain mutex carries the queue.
pub struct EventQueue {
    pending: Mutex<VecDeque<CacheEvent>>,
    epochs: AtomicU64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            epochs: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, kind: EventKind) {
        let event = CacheEvent {
            id: Uuid::new_v4(),
            epoch: self.epochs.fetch_add(1, Ordering::SeqCst),
            kind,
        };

        info!(
            event_id = %event.id,
            event_epoch = event.epoch,
            event_kind = ?kind,
            "cache event enqueued"
        );

        queue_guard(&self.pending, "publish").push_back(event);
    }

    /// Drain up to `limit` events in publish order.
    pub fn drain(&self, limit: usize) -> Vec<CacheEvent> {
        let mut pending = queue_guard(&self.pending, "drain");
        let count = limit.min(pending.len());
        pending.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        queue_guard(&self.pending, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
