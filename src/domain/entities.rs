//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub is_top: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The slice of an article carried inside cached bundles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
}

/// A tag together with the number of articles filed under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagWithCount {
    pub id: Uuid,
    pub name: String,
    pub article_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    pub id: Uuid,
    pub article_id: Uuid,
    pub nickname: String,
    pub content: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FriendshipLinkRecord {
    pub name: String,
    pub url: String,
    pub sort: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GitProjectRecord {
    pub name: String,
    pub project_type: String,
    pub sort: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigEntryRecord {
    pub name: String,
    pub value: String,
}
