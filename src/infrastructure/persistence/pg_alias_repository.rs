//! PostgreSQL implementation of alias repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::{ALIAS_PARTITION_KEY, AliasId, AliasRecord, ConcurrencyToken};
use crate::domain::repositories::AliasRepository;
use crate::error::AppError;

/// PostgreSQL repository for alias records.
///
/// Upserts use `ON CONFLICT DO UPDATE` with no version check, matching the
/// wildcard concurrency token.
///
/// PostgreSQL `TEXT` cannot hold NUL characters. A lookup of an alias containing
/// one finds nothing, and storing one is rejected as a validation error before
/// the query is sent.
pub struct PgAliasRepository {
    pool: Arc<PgPool>,
}

impl PgAliasRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn to_record(partition_key: String, alias: String, url: String) -> Result<AliasRecord, AppError> {
    let alias = AliasId::parse(&alias).map_err(|_| {
        AppError::internal(
            "Stored alias violates alias rules",
            json!({ "alias": alias }),
        )
    })?;

    Ok(AliasRecord {
        partition_key,
        alias,
        url,
        etag: ConcurrencyToken::Any,
    })
}

fn storable(record: &AliasRecord) -> Result<(), AppError> {
    for (field, value) in [("alias", record.alias.as_str()), ("url", record.url.as_str())] {
        if value.contains('\0') {
            return Err(AppError::bad_request(
                "Value cannot be stored",
                json!({ "field": field, "reason": "NUL characters are not supported" }),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl AliasRepository for PgAliasRepository {
    async fn get(&self, alias: &AliasId) -> Result<Option<AliasRecord>, AppError> {
        if alias.as_str().contains('\0') {
            return Ok(None);
        }

        let row: Option<(String, String, String)> = sqlx::query_as(
            r#"
            SELECT partition_key, alias, url
            FROM aliases
            WHERE partition_key = $1 AND alias = $2
            "#,
        )
        .bind(ALIAS_PARTITION_KEY)
        .bind(alias.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|(pk, alias, url)| to_record(pk, alias, url))
            .transpose()
    }

    async fn upsert(&self, record: AliasRecord) -> Result<(), AppError> {
        storable(&record)?;

        sqlx::query(
            r#"
            INSERT INTO aliases (partition_key, alias, url)
            VALUES ($1, $2, $3)
            ON CONFLICT (partition_key, alias)
            DO UPDATE SET url = EXCLUDED.url, updated_at = NOW()
            "#,
        )
        .bind(&record.partition_key)
        .bind(record.alias.as_str())
        .bind(&record.url)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn list_keys(&self) -> Result<HashSet<String>, AppError> {
        let keys: Vec<String> =
            sqlx::query_scalar("SELECT alias FROM aliases WHERE partition_key = $1")
                .bind(ALIAS_PARTITION_KEY)
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(keys.into_iter().collect())
    }

    async fn list(&self) -> Result<Vec<AliasRecord>, AppError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            r#"
            SELECT partition_key, alias, url
            FROM aliases
            WHERE partition_key = $1
            ORDER BY alias
            "#,
        )
        .bind(ALIAS_PARTITION_KEY)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter()
            .map(|(pk, alias, url)| to_record(pk, alias, url))
            .collect()
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM aliases WHERE partition_key = $1")
            .bind(ALIAS_PARTITION_KEY)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
