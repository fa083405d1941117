//! Shared view-data aggregates stored in the cache.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::entities::{
    ArticleSummary, CategoryRecord, CommentRecord, FriendshipLinkRecord, GitProjectRecord,
    TagWithCount,
};

/// The `common` bundle shared by every home-group page.
///
/// Ordering is fixed by the repositories: top articles newest first,
/// friendship links and git projects by ascending sort key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonBundle {
    pub categories: Vec<CategoryRecord>,
    pub tags: Vec<TagWithCount>,
    pub top_articles: Vec<ArticleSummary>,
    pub recent_comments: Vec<CommentRecord>,
    pub friendship_links: Vec<FriendshipLinkRecord>,
    pub git_projects: Vec<GitProjectRecord>,
}

/// All configuration rows as a name → value mapping.
///
/// Absent keys are not an error anywhere in the crate; they read as
/// empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigMap(BTreeMap<String, String>);

impl ConfigMap {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Look up a key, treating absence as the empty string.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Look up a key, yielding `None` when the value is absent or blank.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        let value = self.get(name).trim();
        (!value.is_empty()).then_some(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
