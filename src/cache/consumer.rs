//! Cache consumer.
//!
//! Drains pending events, folds them through the dependency table and
//! evicts the affected entries. Warmup events repopulate the cache
//! through the registered warmer.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use tracing::{info, instrument};
use uuid::Uuid;

use super::config::CacheConfig;
use super::events::EventQueue;
use super::keys::CacheKey;
use super::map::dependent_keys;
use super::store::CacheStore;

pub(crate) const METRIC_CACHE_CONSUME_MS: &str = "brezza_cache_consume_ms";

/// Repopulates cache entries after a warmup event.
///
/// Implemented by the view-data composer; kept as a trait so the
/// consumer stays testable without repositories.
#[async_trait]
pub trait CacheWarmer: Send + Sync {
    async fn warm(&self);
}

/// Processes cache events and maintains cache consistency.
pub struct CacheConsumer {
    config: CacheConfig,
    store: Arc<CacheStore>,
    queue: Arc<EventQueue>,
    warmer: Option<Arc<dyn CacheWarmer>>,
}

impl CacheConsumer {
    pub fn new(config: CacheConfig, store: Arc<CacheStore>, queue: Arc<EventQueue>) -> Self {
        Self {
            config,
            store,
            queue,
            warmer: None,
        }
    }

    /// Register the warmer invoked for warmup events.
    pub fn with_warmer(mut self, warmer: Arc<dyn CacheWarmer>) -> Self {
        self.warmer = Some(warmer);
        self
    }

    /// Consume pending events and execute the resulting evictions.
    ///
    /// Returns true if any events were processed.
    #[instrument(skip(self))]
    pub async fn consume(&self) -> bool {
        let consume_started_at = Instant::now();
        let events = self.queue.drain(self.config.consume_batch_limit);
        if events.is_empty() {
            return false;
        }

        let event_count = events.len();
        let mut seen_ids: HashSet<Uuid> = HashSet::new();
        let mut evict: HashSet<CacheKey> = HashSet::new();
        let mut warm = false;

        for event in events {
            if !seen_ids.insert(event.id) {
                continue;
            }
            match event.kind.entity() {
                Some(entity) => evict.extend(dependent_keys(entity)),
                None => warm = true,
            }
        }

        info!(
            event_count,
            evict = ?evict.iter().map(CacheKey::as_str).collect::<Vec<_>>(),
            warm,
            "consuming cache events"
        );

        for key in &evict {
            self.store.invalidate(*key);
        }

        if warm {
            if let Some(warmer) = &self.warmer {
                warmer.warm().await;
            }
        }

        info!(event_count, evicted = evict.len(), "cache events consumed");

        histogram!(METRIC_CACHE_CONSUME_MS)
            .record(consume_started_at.elapsed().as_secs_f64() * 1000.0);

        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::cache::events::EventKind;
    use crate::cache::keys::EntityKind;
    use crate::domain::view_data::{CommonBundle, ConfigMap};

    fn seeded_store() -> Arc<CacheStore> {
        let store = Arc::new(CacheStore::new(&CacheConfig::default()));
        store.set_common(CommonBundle {
            categories: Vec::new(),
            tags: Vec::new(),
            top_articles: Vec::new(),
            recent_comments: Vec::new(),
            friendship_links: Vec::new(),
            git_projects: Vec::new(),
        });
        store.set_config(ConfigMap::default());
        store
    }

    fn consumer_for(store: Arc<CacheStore>, queue: Arc<EventQueue>) -> CacheConsumer {
        CacheConsumer::new(CacheConfig::default(), store, queue)
    }

    #[tokio::test]
    async fn consume_without_events_is_a_no_op() {
        let store = seeded_store();
        let queue = Arc::new(EventQueue::new());
        let consumer = consumer_for(store.clone(), queue);

        assert!(!consumer.consume().await);
        assert!(store.get_common().is_some());
    }

    #[tokio::test]
    async fn config_event_evicts_config_but_not_common() {
        let store = seeded_store();
        let queue = Arc::new(EventQueue::new());
        queue.publish(EventKind::Updated(EntityKind::ConfigEntry));
        let consumer = consumer_for(store.clone(), queue);

        assert!(consumer.consume().await);
        assert!(store.get_config().is_none());
        assert!(store.get_common().is_some());
    }

    #[tokio::test]
    async fn comment_event_evicts_common() {
        let store = seeded_store();
        let queue = Arc::new(EventQueue::new());
        queue.publish(EventKind::Created(EntityKind::Comment));
        let consumer = consumer_for(store.clone(), queue);

        assert!(consumer.consume().await);
        assert!(store.get_common().is_none());
        assert!(store.get_config().is_some());
    }

    struct CountingWarmer(AtomicUsize);

    #[async_trait]
    impl CacheWarmer for CountingWarmer {
        async fn warm(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn warmup_event_invokes_the_warmer_once_per_batch() {
        let store = seeded_store();
        let queue = Arc::new(EventQueue::new());
        queue.publish(EventKind::WarmupOnStartup);
        queue.publish(EventKind::WarmupOnStartup);

        let warmer = Arc::new(CountingWarmer(AtomicUsize::new(0)));
        let consumer = consumer_for(store, queue).with_warmer(warmer.clone());

        assert!(consumer.consume().await);
        assert_eq!(warmer.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn batch_limit_leaves_excess_events_queued() {
        let store = seeded_store();
        let queue = Arc::new(EventQueue::new());
        for _ in 0..3 {
            queue.publish(EventKind::Updated(EntityKind::Category));
        }

        let config = CacheConfig {
            consume_batch_limit: 2,
            ..Default::default()
        };
        let consumer = CacheConsumer::new(config, store, queue.clone());

        assert!(consumer.consume().await);
        assert_eq!(queue.len(), 1);
    }
}
