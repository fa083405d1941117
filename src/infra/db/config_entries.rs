use async_trait::async_trait;
use sqlx::query_as;

use crate::{
    application::repos::{ConfigRepo, RepoError},
    domain::entities::ConfigEntryRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ConfigEntryRow {
    name: String,
    value: String,
}

impl From<ConfigEntryRow> for ConfigEntryRecord {
    fn from(row: ConfigEntryRow) -> Self {
        Self {
            name: row.name,
            value: row.value,
        }
    }
}

#[async_trait]
impl ConfigRepo for PostgresRepositories {
    async fn load_config_entries(&self) -> Result<Vec<ConfigEntryRecord>, RepoError> {
        let rows = query_as::<_, ConfigEntryRow>(
            r#"
            SELECT name, value
            FROM config_entries
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ConfigEntryRecord::from).collect())
    }

    async fn upsert_config_entry(
        &self,
        name: &str,
        value: &str,
    ) -> Result<ConfigEntryRecord, RepoError> {
        let row = query_as::<_, ConfigEntryRow>(
            r#"
            INSERT INTO config_entries (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = now()
            RETURNING name, value
            "#,
        )
        .bind(name)
        .bind(value)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ConfigEntryRecord::from(row))
    }
}
