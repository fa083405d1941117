//! Cache storage.
//!
//! Fixed-key slots for the shared view-data aggregates. Each slot keeps
//! the value together with its write instant; reads past the TTL behave
//! as misses and the stale value is dropped on the next write.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use metrics::counter;

use crate::domain::entities::ArticleSummary;
use crate::domain::view_data::{CommonBundle, ConfigMap};

use super::config::CacheConfig;
use super::keys::CacheKey;
use super::lock::{read_guard, write_guard};

pub(crate) const METRIC_CACHE_HIT: &str = "brezza_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "brezza_cache_miss_total";

struct Slot<T> {
    value: T,
    stored_at: Instant,
}

impl<T: Clone> Slot<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn live_value(&self, ttl: Duration) -> Option<T> {
        (self.stored_at.elapsed() < ttl).then(|| self.value.clone())
    }
}

/// In-process store for the shared view-data cache.
///
/// Reads and writes are atomic per key but not transactional across
/// keys; a concurrent invalidation may race a repopulation, leaving the
/// entry briefly stale within the TTL bound.
pub struct CacheStore {
    ttl: Duration,
    common: RwLock<Option<Slot<CommonBundle>>>,
    config: RwLock<Option<Slot<ConfigMap>>>,
    featured_article: RwLock<Option<Slot<ArticleSummary>>>,
}

impl CacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            ttl: config.ttl(),
            common: RwLock::new(None),
            config: RwLock::new(None),
            featured_article: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get_common(&self) -> Option<CommonBundle> {
        let hit = read_guard(&self.common, "common")
            .as_ref()
            .and_then(|slot| slot.live_value(self.ttl));
        Self::record_lookup(CacheKey::Common, hit.is_some());
        hit
    }

    pub fn set_common(&self, value: CommonBundle) {
        *write_guard(&self.common, "common") = Some(Slot::new(value));
    }

    pub fn get_config(&self) -> Option<ConfigMap> {
        let hit = read_guard(&self.config, "config")
            .as_ref()
            .and_then(|slot| slot.live_value(self.ttl));
        Self::record_lookup(CacheKey::Config, hit.is_some());
        hit
    }

    pub fn set_config(&self, value: ConfigMap) {
        *write_guard(&self.config, "config") = Some(Slot::new(value));
    }

    pub fn get_featured_article(&self) -> Option<ArticleSummary> {
        let hit = read_guard(&self.featured_article, "featured_article")
            .as_ref()
            .and_then(|slot| slot.live_value(self.ttl));
        Self::record_lookup(CacheKey::FeaturedArticle, hit.is_some());
        hit
    }

    pub fn set_featured_article(&self, value: ArticleSummary) {
        *write_guard(&self.featured_article, "featured_article") = Some(Slot::new(value));
    }

    /// Evict a single entry.
    pub fn invalidate(&self, key: CacheKey) {
        match key {
            CacheKey::Common => *write_guard(&self.common, "common") = None,
            CacheKey::Config => *write_guard(&self.config, "config") = None,
            CacheKey::FeaturedArticle => {
                *write_guard(&self.featured_article, "featured_article") = None
            }
        }
    }

    /// Evict everything.
    pub fn clear(&self) {
        for key in CacheKey::ALL {
            self.invalidate(key);
        }
    }

    fn record_lookup(key: CacheKey, hit: bool) {
        let metric = if hit { METRIC_CACHE_HIT } else { METRIC_CACHE_MISS };
        counter!(metric, "key" => key.as_str()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use uuid::Uuid;

    use super::*;

    fn sample_common() -> CommonBundle {
        CommonBundle {
            categories: Vec::new(),
            tags: Vec::new(),
            top_articles: Vec::new(),
            recent_comments: Vec::new(),
            friendship_links: Vec::new(),
            git_projects: Vec::new(),
        }
    }

    fn store_with_ttl_minutes(ttl_minutes: u64) -> CacheStore {
        CacheStore::new(&CacheConfig {
            ttl_minutes,
            ..Default::default()
        })
    }

    #[test]
    fn entries_round_trip_within_ttl() {
        let store = store_with_ttl_minutes(10080);

        assert!(store.get_common().is_none());
        store.set_common(sample_common());
        assert!(store.get_common().is_some());

        assert!(store.get_config().is_none());
        store.set_config(ConfigMap::new([(
            "SITE_NAME".to_string(),
            "brezza".to_string(),
        )]));
        assert_eq!(store.get_config().expect("cached config").get("SITE_NAME"), "brezza");

        let article = ArticleSummary {
            id: Uuid::nil(),
            title: "Hello".to_string(),
        };
        store.set_featured_article(article.clone());
        assert_eq!(store.get_featured_article(), Some(article));
    }

    #[test]
    fn expired_entries_read_as_misses() {
        let store = store_with_ttl_minutes(0);

        store.set_common(sample_common());
        store.set_config(ConfigMap::default());
        store.set_featured_article(ArticleSummary {
            id: Uuid::nil(),
            title: "Hello".to_string(),
        });

        assert!(store.get_common().is_none());
        assert!(store.get_config().is_none());
        assert!(store.get_featured_article().is_none());
    }

    #[test]
    fn invalidate_evicts_only_the_named_key() {
        let store = store_with_ttl_minutes(10080);
        store.set_common(sample_common());
        store.set_config(ConfigMap::default());

        store.invalidate(CacheKey::Config);

        assert!(store.get_common().is_some());
        assert!(store.get_config().is_none());
    }

    #[test]
    fn clear_evicts_everything() {
        let store = store_with_ttl_minutes(10080);
        store.set_common(sample_common());
        store.set_config(ConfigMap::default());

        store.clear();

        assert!(store.get_common().is_none());
        assert!(store.get_config().is_none());
        assert!(store.get_featured_article().is_none());
    }

    #[test]
    fn store_recovers_from_poisoned_lock() {
        let store = store_with_ttl_minutes(10080);

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.common.write().expect("common lock should be acquired");
            panic!("poison common lock");
        }));

        store.set_common(sample_common());
        assert!(store.get_common().is_some());
    }
}
