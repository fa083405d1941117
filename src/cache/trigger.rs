//! Write-side entry point into the invalidation pipeline.

use std::sync::Arc;

use tracing::debug;

use super::config::CacheConfig;
use super::consumer::CacheConsumer;
use super::events::{EventKind, EventQueue};
use super::keys::EntityKind;

/// When a published event is folded into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Consume {
    /// In the caller's task, before the write call returns.
    Inline,
    /// Left for the background interval task.
    Deferred,
}

/// Publishes cache events on behalf of the write services.
///
/// Each write calls the method matching its lifecycle change after the
/// row is persisted. Admin writes consume inline, so the dependent
/// entries are evicted before the call returns; bursty visitor writes
/// defer to the background interval task, which folds a whole burst
/// into one eviction pass.
pub struct CacheTrigger {
    config: CacheConfig,
    queue: Arc<EventQueue>,
    consumer: Arc<CacheConsumer>,
}

impl CacheTrigger {
    pub fn new(config: CacheConfig, queue: Arc<EventQueue>, consumer: Arc<CacheConsumer>) -> Self {
        Self {
            config,
            queue,
            consumer,
        }
    }

    async fn publish(&self, kind: EventKind, consume: Consume) {
        if !self.config.enabled {
            debug!(event_kind = ?kind, "cache disabled, event dropped");
            return;
        }

        self.queue.publish(kind);

        if consume == Consume::Inline {
            self.consumer.consume().await;
        }
    }

    pub async fn entity_created(&self, entity: EntityKind) {
        self.publish(EventKind::Created(entity), Consume::Inline).await;
    }

    /// Publish a create without consuming inline; the interval task
    /// folds it in within `auto_consume_interval_ms`.
    pub async fn entity_created_deferred(&self, entity: EntityKind) {
        self.publish(EventKind::Created(entity), Consume::Deferred).await;
    }

    pub async fn entity_updated(&self, entity: EntityKind) {
        self.publish(EventKind::Updated(entity), Consume::Inline).await;
    }

    pub async fn entity_deleted(&self, entity: EntityKind) {
        self.publish(EventKind::Deleted(entity), Consume::Inline).await;
    }

    /// Queue a repopulation pass for startup.
    pub async fn warmup_on_startup(&self) {
        self.publish(EventKind::WarmupOnStartup, Consume::Inline).await;
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn consumer(&self) -> &Arc<CacheConsumer> {
        &self.consumer
    }
}
