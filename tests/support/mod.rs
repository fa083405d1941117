//! Shared in-memory repositories for integration tests.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use brezza::application::composer::ViewDataComposer;
use brezza::application::repos::{
    ArticlesRepo, ArticlesWriteRepo, CategoriesRepo, CommentsRepo, CommentsWriteRepo, ConfigRepo,
    CreateArticleParams, CreateCommentParams, LinksRepo, RepoError, TagsRepo, UpdateArticleParams,
};
use brezza::cache::{CacheConfig, CacheConsumer, CacheStore, CacheTrigger, EventQueue};
use brezza::domain::entities::{
    ArticleRecord, ArticleSummary, CategoryRecord, CommentRecord, ConfigEntryRecord,
    FriendshipLinkRecord, GitProjectRecord, TagWithCount,
};

/// In-memory stand-in for the Postgres repositories.
///
/// Read methods honor the same ordering contracts as the real queries
/// and count their invocations so tests can assert cache behavior.
#[derive(Default)]
pub struct MockDb {
    pub categories: Mutex<Vec<CategoryRecord>>,
    pub tags: Mutex<Vec<TagWithCount>>,
    pub articles: Mutex<Vec<ArticleRecord>>,
    pub comments: Mutex<Vec<CommentRecord>>,
    pub friendship_links: Mutex<Vec<FriendshipLinkRecord>>,
    pub git_projects: Mutex<Vec<GitProjectRecord>>,
    pub config_entries: Mutex<Vec<ConfigEntryRecord>>,

    pub category_loads: AtomicUsize,
    pub config_loads: AtomicUsize,
    pub summary_lookups: AtomicUsize,
}

impl MockDb {
    pub fn set_config(&self, name: &str, value: &str) {
        let mut entries = self.config_entries.lock().expect("config entries lock");
        if let Some(entry) = entries.iter_mut().find(|entry| entry.name == name) {
            entry.value = value.to_string();
        } else {
            entries.push(ConfigEntryRecord {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    pub fn push_article(&self, title: &str, is_top: bool, age_days: i64) -> ArticleRecord {
        let created_at = OffsetDateTime::now_utc() - Duration::days(age_days);
        let article = ArticleRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: format!("body of {title}"),
            is_top,
            created_at,
            updated_at: created_at,
        };
        self.articles
            .lock()
            .expect("articles lock")
            .push(article.clone());
        article
    }
}

#[async_trait]
impl CategoriesRepo for MockDb {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        self.category_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.categories.lock().expect("categories lock").clone())
    }
}

#[async_trait]
impl TagsRepo for MockDb {
    async fn list_article_counts(&self) -> Result<Vec<TagWithCount>, RepoError> {
        Ok(self.tags.lock().expect("tags lock").clone())
    }
}

#[async_trait]
impl ArticlesRepo for MockDb {
    async fn list_top_articles(&self) -> Result<Vec<ArticleSummary>, RepoError> {
        let mut articles: Vec<ArticleRecord> = self
            .articles
            .lock()
            .expect("articles lock")
            .iter()
            .filter(|article| article.is_top)
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(articles
            .iter()
            .map(|article| ArticleSummary {
                id: article.id,
                title: article.title.clone(),
            })
            .collect())
    }

    async fn list_recent_articles(&self, limit: u32) -> Result<Vec<ArticleRecord>, RepoError> {
        let mut articles = self.articles.lock().expect("articles lock").clone();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        articles.truncate(limit as usize);
        Ok(articles)
    }

    async fn find_article(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError> {
        Ok(self
            .articles
            .lock()
            .expect("articles lock")
            .iter()
            .find(|article| article.id == id)
            .cloned())
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<ArticleSummary>, RepoError> {
        self.summary_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .articles
            .lock()
            .expect("articles lock")
            .iter()
            .find(|article| article.id == id)
            .map(|article| ArticleSummary {
                id: article.id,
                title: article.title.clone(),
            }))
    }
}

#[async_trait]
impl ArticlesWriteRepo for MockDb {
    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let article = ArticleRecord {
            id: Uuid::new_v4(),
            title: params.title,
            body: params.body,
            is_top: params.is_top,
            created_at: now,
            updated_at: now,
        };
        self.articles
            .lock()
            .expect("articles lock")
            .push(article.clone());
        Ok(article)
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let mut articles = self.articles.lock().expect("articles lock");
        let article = articles
            .iter_mut()
            .find(|article| article.id == params.id)
            .ok_or(RepoError::NotFound)?;
        article.title = params.title;
        article.body = params.body;
        article.is_top = params.is_top;
        article.updated_at = OffsetDateTime::now_utc();
        Ok(article.clone())
    }

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError> {
        let mut articles = self.articles.lock().expect("articles lock");
        let before = articles.len();
        articles.retain(|article| article.id != id);
        if articles.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentsRepo for MockDb {
    async fn list_recent_comments(&self, limit: u32) -> Result<Vec<CommentRecord>, RepoError> {
        let mut comments = self.comments.lock().expect("comments lock").clone();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments.truncate(limit as usize);
        Ok(comments)
    }
}

#[async_trait]
impl CommentsWriteRepo for MockDb {
    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let comment = CommentRecord {
            id: Uuid::new_v4(),
            article_id: params.article_id,
            nickname: params.nickname,
            content: params.content,
            created_at: OffsetDateTime::now_utc(),
        };
        self.comments
            .lock()
            .expect("comments lock")
            .push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl LinksRepo for MockDb {
    async fn list_friendship_links(&self) -> Result<Vec<FriendshipLinkRecord>, RepoError> {
        let mut links = self.friendship_links.lock().expect("links lock").clone();
        links.sort_by_key(|link| link.sort);
        Ok(links)
    }

    async fn list_git_projects(&self) -> Result<Vec<GitProjectRecord>, RepoError> {
        let mut projects = self.git_projects.lock().expect("projects lock").clone();
        projects.sort_by_key(|project| project.sort);
        Ok(projects)
    }
}

#[async_trait]
impl ConfigRepo for MockDb {
    async fn load_config_entries(&self) -> Result<Vec<ConfigEntryRecord>, RepoError> {
        self.config_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.config_entries.lock().expect("config lock").clone())
    }

    async fn upsert_config_entry(
        &self,
        name: &str,
        value: &str,
    ) -> Result<ConfigEntryRecord, RepoError> {
        self.set_config(name, value);
        Ok(ConfigEntryRecord {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Composer plus cache infrastructure wired over a [`MockDb`].
pub struct TestHarness {
    pub db: Arc<MockDb>,
    pub store: Arc<CacheStore>,
    pub composer: Arc<ViewDataComposer>,
    pub trigger: Arc<CacheTrigger>,
}

pub fn harness() -> TestHarness {
    harness_with_config(CacheConfig::default())
}

pub fn harness_with_config(cache_config: CacheConfig) -> TestHarness {
    let db = Arc::new(MockDb::default());
    let store = Arc::new(CacheStore::new(&cache_config));

    let composer = Arc::new(
        ViewDataComposer::new(
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            10,
        )
        .with_cache_opt(Some(store.clone())),
    );

    let queue = Arc::new(EventQueue::new());
    let consumer = Arc::new(
        CacheConsumer::new(cache_config.clone(), store.clone(), queue.clone())
            .with_warmer(composer.clone()),
    );
    let trigger = Arc::new(CacheTrigger::new(cache_config, queue, consumer));

    TestHarness {
        db,
        store,
        composer,
        trigger,
    }
}
