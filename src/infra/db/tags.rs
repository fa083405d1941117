use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use crate::{
    application::repos::{RepoError, TagsRepo},
    domain::entities::TagWithCount,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct TagCountRow {
    id: Uuid,
    name: String,
    article_count: i64,
}

#[async_trait]
impl TagsRepo for PostgresRepositories {
    async fn list_article_counts(&self) -> Result<Vec<TagWithCount>, RepoError> {
        let rows = query_as::<_, TagCountRow>(
            r#"
            SELECT t.id,
                   t.name,
                   COUNT(jt.article_id) AS article_count
            FROM tags t
            LEFT JOIN article_tags jt ON jt.tag_id = t.id
            GROUP BY t.id, t.name
            ORDER BY t.name
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| TagWithCount {
                id: row.id,
                name: row.name,
                article_count: row.article_count,
            })
            .collect())
    }
}
