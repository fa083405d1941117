use async_trait::async_trait;
use sqlx::query_as;

use crate::{
    application::repos::{LinksRepo, RepoError},
    domain::entities::{FriendshipLinkRecord, GitProjectRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct FriendshipLinkRow {
    name: String,
    url: String,
    sort: i32,
}

#[derive(sqlx::FromRow)]
struct GitProjectRow {
    name: String,
    project_type: String,
    sort: i32,
}

#[async_trait]
impl LinksRepo for PostgresRepositories {
    async fn list_friendship_links(&self) -> Result<Vec<FriendshipLinkRecord>, RepoError> {
        let rows = query_as::<_, FriendshipLinkRow>(
            r#"
            SELECT name, url, sort
            FROM friendship_links
            ORDER BY sort
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| FriendshipLinkRecord {
                name: row.name,
                url: row.url,
                sort: row.sort,
            })
            .collect())
    }

    async fn list_git_projects(&self) -> Result<Vec<GitProjectRecord>, RepoError> {
        let rows = query_as::<_, GitProjectRow>(
            r#"
            SELECT name, project_type, sort
            FROM git_projects
            ORDER BY sort
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| GitProjectRecord {
                name: row.name,
                project_type: row.project_type,
                sort: row.sort,
            })
            .collect())
    }
}
