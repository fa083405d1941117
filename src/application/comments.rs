//! Visitor comment submission.

use std::sync::Arc;

use tracing::info;

use crate::application::error::AppError;
use crate::application::repos::{CommentsWriteRepo, CreateCommentParams, RepoError};
use crate::cache::{CacheTrigger, EntityKind};
use crate::domain::entities::CommentRecord;

const MAX_COMMENT_CHARS: usize = 4000;

pub struct CommentService {
    comments: Arc<dyn CommentsWriteRepo>,
    cache_trigger: Option<Arc<CacheTrigger>>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentsWriteRepo>) -> Self {
        Self {
            comments,
            cache_trigger: None,
        }
    }

    pub fn with_cache_trigger_opt(mut self, trigger: Option<Arc<CacheTrigger>>) -> Self {
        self.cache_trigger = trigger;
        self
    }

    pub async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, AppError> {
        if params.content.trim().is_empty() {
            return Err(AppError::validation("comment content must not be empty"));
        }
        if params.content.chars().count() > MAX_COMMENT_CHARS {
            return Err(AppError::validation("comment content is too long"));
        }

        let comment = self
            .comments
            .create_comment(params)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => AppError::NotFound,
                RepoError::Constraint(message) => AppError::Validation(message),
                other => AppError::unexpected(other.to_string()),
            })?;

        info!(
            target = "brezza::comments",
            comment_id = %comment.id,
            article_id = %comment.article_id,
            "comment created"
        );
        // Comments arrive in bursts; deferring lets one consumption
        // pass fold a burst into a single eviction.
        if let Some(trigger) = &self.cache_trigger {
            trigger.entity_created_deferred(EntityKind::Comment).await;
        }
        Ok(comment)
    }
}
