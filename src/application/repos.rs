//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{
    ArticleRecord, ArticleSummary, CategoryRecord, CommentRecord, ConfigEntryRecord,
    FriendshipLinkRecord, GitProjectRecord, TagWithCount,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("resource not found")]
    NotFound,
    #[error("rejected by constraint: {0}")]
    Constraint(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RepoError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// Navigation categories, id ascending.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait TagsRepo: Send + Sync {
    /// Every tag with its article count.
    async fn list_article_counts(&self) -> Result<Vec<TagWithCount>, RepoError>;
}

#[async_trait]
pub trait ArticlesRepo: Send + Sync {
    /// Top-flagged articles, newest first.
    async fn list_top_articles(&self) -> Result<Vec<ArticleSummary>, RepoError>;

    /// Most recent articles for the home index, newest first.
    async fn list_recent_articles(&self, limit: u32) -> Result<Vec<ArticleRecord>, RepoError>;

    async fn find_article(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError>;

    async fn find_summary(&self, id: Uuid) -> Result<Option<ArticleSummary>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateArticleParams {
    pub title: String,
    pub body: String,
    pub is_top: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateArticleParams {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub is_top: bool,
}

#[async_trait]
pub trait ArticlesWriteRepo: Send + Sync {
    async fn create_article(&self, params: CreateArticleParams) -> Result<ArticleRecord, RepoError>;

    async fn update_article(&self, params: UpdateArticleParams) -> Result<ArticleRecord, RepoError>;

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    /// Most recent comments, newest first.
    async fn list_recent_comments(&self, limit: u32) -> Result<Vec<CommentRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub article_id: Uuid,
    pub nickname: String,
    pub content: String,
}

#[async_trait]
pub trait CommentsWriteRepo: Send + Sync {
    async fn create_comment(&self, params: CreateCommentParams) -> Result<CommentRecord, RepoError>;
}

#[async_trait]
pub trait LinksRepo: Send + Sync {
    /// Friendship links, ascending sort key.
    async fn list_friendship_links(&self) -> Result<Vec<FriendshipLinkRecord>, RepoError>;

    /// Git-project links, ascending sort key.
    async fn list_git_projects(&self) -> Result<Vec<GitProjectRecord>, RepoError>;
}

#[async_trait]
pub trait ConfigRepo: Send + Sync {
    async fn load_config_entries(&self) -> Result<Vec<ConfigEntryRecord>, RepoError>;

    async fn upsert_config_entry(
        &self,
        name: &str,
        value: &str,
    ) -> Result<ConfigEntryRecord, RepoError>;
}
