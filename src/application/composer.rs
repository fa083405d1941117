//! Shared view-data composition.
//!
//! Assembles the cached bundles injected into every rendered page: the
//! `common` sidebar bundle for home-group pages and the site-wide
//! config bundle (config mapping, featured article, OAuth snapshot).

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::error::HttpError;
use crate::application::oauth::OauthProviders;
use crate::application::repos::{
    ArticlesRepo, CategoriesRepo, CommentsRepo, ConfigRepo, LinksRepo, RepoError, TagsRepo,
};
use crate::cache::{CacheStore, CacheWarmer};
use crate::domain::entities::ArticleSummary;
use crate::domain::view_data::{CommonBundle, ConfigMap};

/// Config row naming the featured article.
pub const FEATURED_ARTICLE_CONFIG_KEY: &str = "QQ_QUN_ARTICLE_ID";

/// Values composed into every page render.
#[derive(Debug, Clone)]
pub struct SiteBundle {
    pub config: ConfigMap,
    pub featured_article: Option<ArticleSummary>,
    pub oauth: OauthProviders,
}

#[derive(Clone)]
pub struct ViewDataComposer {
    categories: Arc<dyn CategoriesRepo>,
    tags: Arc<dyn TagsRepo>,
    articles: Arc<dyn ArticlesRepo>,
    comments: Arc<dyn CommentsRepo>,
    links: Arc<dyn LinksRepo>,
    config: Arc<dyn ConfigRepo>,
    cache: Option<Arc<CacheStore>>,
    recent_comments_limit: u32,
}

impl ViewDataComposer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        categories: Arc<dyn CategoriesRepo>,
        tags: Arc<dyn TagsRepo>,
        articles: Arc<dyn ArticlesRepo>,
        comments: Arc<dyn CommentsRepo>,
        links: Arc<dyn LinksRepo>,
        config: Arc<dyn ConfigRepo>,
        recent_comments_limit: u32,
    ) -> Self {
        Self {
            categories,
            tags,
            articles,
            comments,
            links,
            config,
            cache: None,
            recent_comments_limit,
        }
    }

    /// Attach the cache store; without one every bundle is recomputed.
    pub fn with_cache_opt(mut self, cache: Option<Arc<CacheStore>>) -> Self {
        self.cache = cache;
        self
    }

    /// The `common` bundle for home-group pages, cache-or-recompute.
    pub async fn home_bundle(&self) -> Result<CommonBundle, HttpError> {
        if let Some(store) = &self.cache {
            if let Some(hit) = store.get_common() {
                return Ok(hit);
            }
        }

        let bundle = self.load_common().await?;
        if let Some(store) = &self.cache {
            store.set_common(bundle.clone());
        }
        Ok(bundle)
    }

    /// The site-wide bundle composed into every page.
    pub async fn site_bundle(&self) -> Result<SiteBundle, HttpError> {
        let config = self.config_map().await?;
        let featured_article = self.featured_article(&config).await?;
        let oauth = OauthProviders::from_config(&config);

        Ok(SiteBundle {
            config,
            featured_article,
            oauth,
        })
    }

    /// The config mapping, cache-or-recompute.
    pub async fn config_map(&self) -> Result<ConfigMap, HttpError> {
        if let Some(store) = &self.cache {
            if let Some(hit) = store.get_config() {
                return Ok(hit);
            }
        }

        let config = self.load_config().await?;
        if let Some(store) = &self.cache {
            store.set_config(config.clone());
        }
        Ok(config)
    }

    async fn load_common(&self) -> Result<CommonBundle, HttpError> {
        let (categories, tags, top_articles, recent_comments, friendship_links, git_projects) =
            tokio::try_join!(
                self.categories.list_categories(),
                self.tags.list_article_counts(),
                self.articles.list_top_articles(),
                self.comments.list_recent_comments(self.recent_comments_limit),
                self.links.list_friendship_links(),
                self.links.list_git_projects(),
            )
            .map_err(|err| compose_failed("load_common", err))?;

        Ok(CommonBundle {
            categories,
            tags,
            top_articles,
            recent_comments,
            friendship_links,
            git_projects,
        })
    }

    async fn load_config(&self) -> Result<ConfigMap, HttpError> {
        let entries = self
            .config
            .load_config_entries()
            .await
            .map_err(|err| compose_failed("load_config_entries", err))?;

        Ok(ConfigMap::new(
            entries.into_iter().map(|entry| (entry.name, entry.value)),
        ))
    }

    /// Resolve the featured article from the config mapping.
    ///
    /// Absent or blank config key, an unparsable id, and a dangling
    /// reference all resolve to `None` without error.
    async fn featured_article(
        &self,
        config: &ConfigMap,
    ) -> Result<Option<ArticleSummary>, HttpError> {
        let Some(raw) = config.non_empty(FEATURED_ARTICLE_CONFIG_KEY) else {
            return Ok(None);
        };

        if let Some(store) = &self.cache {
            if let Some(hit) = store.get_featured_article() {
                return Ok(Some(hit));
            }
        }

        let Ok(id) = Uuid::parse_str(raw) else {
            debug!(
                target = "brezza::composer",
                value = raw,
                "featured-article config value is not a valid id"
            );
            return Ok(None);
        };

        let summary = self
            .articles
            .find_summary(id)
            .await
            .map_err(|err| compose_failed("find_summary", err))?;

        if let Some(summary) = &summary {
            if let Some(store) = &self.cache {
                store.set_featured_article(summary.clone());
            }
        }
        Ok(summary)
    }
}

#[async_trait]
impl CacheWarmer for ViewDataComposer {
    /// Best-effort repopulation of all cached bundles.
    async fn warm(&self) {
        if let Err(err) = self.home_bundle().await {
            warn!(target = "brezza::composer", error = ?err, "common bundle warmup failed");
        }
        match self.site_bundle().await {
            Ok(bundle) => {
                debug!(
                    target = "brezza::composer",
                    config_entries = bundle.config.len(),
                    featured = bundle.featured_article.is_some(),
                    "site bundle warmed"
                );
            }
            Err(err) => {
                warn!(target = "brezza::composer", error = ?err, "site bundle warmup failed");
            }
        }
    }
}

fn compose_failed(operation: &'static str, err: RepoError) -> HttpError {
    HttpError::new(
        "application::composer::ViewDataComposer",
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to compose shared view data",
        format!("{operation}: {err}"),
    )
}
