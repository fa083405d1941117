//! Cache key and observed-model definitions.

/// Cache entries holding shared view aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Home-group sidebar bundle: categories, tag counts, top articles,
    /// recent comments, friendship links, git projects.
    Common,
    /// All configuration rows as a name → value mapping.
    Config,
    /// The featured article resolved from configuration.
    FeaturedArticle,
}

impl CacheKey {
    pub const ALL: [CacheKey; 3] = [CacheKey::Common, CacheKey::Config, CacheKey::FeaturedArticle];

    /// Stable name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Common => "common",
            CacheKey::Config => "config",
            CacheKey::FeaturedArticle => "featured_article",
        }
    }
}

/// Persisted models whose lifecycle events drive invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Article,
    Category,
    Tag,
    Comment,
    FriendshipLink,
    GitProject,
    ConfigEntry,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Article,
        EntityKind::Category,
        EntityKind::Tag,
        EntityKind::Comment,
        EntityKind::FriendshipLink,
        EntityKind::GitProject,
        EntityKind::ConfigEntry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Article => "article",
            EntityKind::Category => "category",
            EntityKind::Tag => "tag",
            EntityKind::Comment => "comment",
            EntityKind::FriendshipLink => "friendship_link",
            EntityKind::GitProject => "git_project",
            EntityKind::ConfigEntry => "config_entry",
        }
    }
}
