//! Headless admin write services.
//!
//! Each successful write publishes the matching cache event so the
//! dependent view-data entries are recomputed on the next render.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::{
    ArticlesWriteRepo, ConfigRepo, CreateArticleParams, RepoError, UpdateArticleParams,
};
use crate::cache::{CacheTrigger, EntityKind};
use crate::domain::entities::{ArticleRecord, ConfigEntryRecord};

fn repo_to_app(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound => AppError::NotFound,
        RepoError::Constraint(message) => AppError::Validation(message),
        other => AppError::unexpected(other.to_string()),
    }
}

pub struct AdminArticleService {
    articles: Arc<dyn ArticlesWriteRepo>,
    cache_trigger: Option<Arc<CacheTrigger>>,
}

impl AdminArticleService {
    pub fn new(articles: Arc<dyn ArticlesWriteRepo>) -> Self {
        Self {
            articles,
            cache_trigger: None,
        }
    }

    pub fn with_cache_trigger_opt(mut self, trigger: Option<Arc<CacheTrigger>>) -> Self {
        self.cache_trigger = trigger;
        self
    }

    pub async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, AppError> {
        if params.title.trim().is_empty() {
            return Err(AppError::validation("article title must not be empty"));
        }

        let article = self
            .articles
            .create_article(params)
            .await
            .map_err(repo_to_app)?;

        info!(target = "brezza::admin", article_id = %article.id, "article created");
        if let Some(trigger) = &self.cache_trigger {
            trigger.entity_created(EntityKind::Article).await;
        }
        Ok(article)
    }

    pub async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, AppError> {
        if params.title.trim().is_empty() {
            return Err(AppError::validation("article title must not be empty"));
        }

        let article = self
            .articles
            .update_article(params)
            .await
            .map_err(repo_to_app)?;

        info!(target = "brezza::admin", article_id = %article.id, "article updated");
        if let Some(trigger) = &self.cache_trigger {
            trigger.entity_updated(EntityKind::Article).await;
        }
        Ok(article)
    }

    pub async fn delete_article(&self, id: Uuid) -> Result<(), AppError> {
        self.articles.delete_article(id).await.map_err(repo_to_app)?;

        info!(target = "brezza::admin", article_id = %id, "article deleted");
        if let Some(trigger) = &self.cache_trigger {
            trigger.entity_deleted(EntityKind::Article).await;
        }
        Ok(())
    }
}

pub struct AdminConfigService {
    config: Arc<dyn ConfigRepo>,
    cache_trigger: Option<Arc<CacheTrigger>>,
}

impl AdminConfigService {
    pub fn new(config: Arc<dyn ConfigRepo>) -> Self {
        Self {
            config,
            cache_trigger: None,
        }
    }

    pub fn with_cache_trigger_opt(mut self, trigger: Option<Arc<CacheTrigger>>) -> Self {
        self.cache_trigger = trigger;
        self
    }

    pub async fn upsert_config_entry(
        &self,
        name: &str,
        value: &str,
    ) -> Result<ConfigEntryRecord, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::validation("config name must not be empty"));
        }

        let entry = self
            .config
            .upsert_config_entry(name, value)
            .await
            .map_err(repo_to_app)?;

        info!(target = "brezza::admin", name = %entry.name, "config entry upserted");
        if let Some(trigger) = &self.cache_trigger {
            trigger.entity_updated(EntityKind::ConfigEntry).await;
        }
        Ok(entry)
    }
}
