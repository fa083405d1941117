use async_trait::async_trait;
use sqlx::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        ArticlesRepo, ArticlesWriteRepo, CreateArticleParams, RepoError, UpdateArticleParams,
    },
    domain::entities::{ArticleRecord, ArticleSummary},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    title: String,
    body: String,
    is_top: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            is_top: row.is_top,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ArticleSummaryRow {
    id: Uuid,
    title: String,
}

impl From<ArticleSummaryRow> for ArticleSummary {
    fn from(row: ArticleSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
        }
    }
}

#[async_trait]
impl ArticlesRepo for PostgresRepositories {
    async fn list_top_articles(&self) -> Result<Vec<ArticleSummary>, RepoError> {
        let rows = query_as::<_, ArticleSummaryRow>(
            r#"
            SELECT id, title
            FROM articles
            WHERE is_top
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleSummary::from).collect())
    }

    async fn list_recent_articles(&self, limit: u32) -> Result<Vec<ArticleRecord>, RepoError> {
        let rows = query_as::<_, ArticleRow>(
            r#"
            SELECT id, title, body, is_top, created_at, updated_at
            FROM articles
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleRecord::from).collect())
    }

    async fn find_article(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError> {
        let row = query_as::<_, ArticleRow>(
            r#"
            SELECT id, title, body, is_top, created_at, updated_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ArticleRecord::from))
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<ArticleSummary>, RepoError> {
        let row = query_as::<_, ArticleSummaryRow>(
            r#"
            SELECT id, title
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ArticleSummary::from))
    }
}

#[async_trait]
impl ArticlesWriteRepo for PostgresRepositories {
    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let row = query_as::<_, ArticleRow>(
            r#"
            INSERT INTO articles (title, body, is_top)
            VALUES ($1, $2, $3)
            RETURNING id, title, body, is_top, created_at, updated_at
            "#,
        )
        .bind(&params.title)
        .bind(&params.body)
        .bind(params.is_top)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ArticleRecord::from(row))
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let row = query_as::<_, ArticleRow>(
            r#"
            UPDATE articles
            SET title = $2, body = $3, is_top = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, title, body, is_top, created_at, updated_at
            "#,
        )
        .bind(params.id)
        .bind(&params.title)
        .bind(&params.body)
        .bind(params.is_top)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(ArticleRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
