//! PostgreSQL implementation of stats repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{STATS_PARTITION_KEY, StatsRecord};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// PostgreSQL repository for per-alias counters.
///
/// Batch upserts run in one transaction.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

type StatsRow = (String, String, i64, DateTime<Utc>, DateTime<Utc>);

fn to_record(row: StatsRow) -> Result<StatsRecord, AppError> {
    let (partition_key, alias, count, last_update_end_time, last_result_captured) = row;
    let count = u64::try_from(count).map_err(|_| {
        AppError::internal(
            "Stored hit count is negative",
            json!({ "alias": alias, "count": count }),
        )
    })?;

    Ok(StatsRecord {
        partition_key,
        alias,
        count,
        last_update_end_time,
        last_result_captured,
    })
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn list(&self) -> Result<Vec<StatsRecord>, AppError> {
        let rows: Vec<StatsRow> = sqlx::query_as(
            r#"
            SELECT partition_key, alias, count, last_update_end_time, last_result_captured
            FROM alias_stats
            WHERE partition_key = $1
            ORDER BY alias
            "#,
        )
        .bind(STATS_PARTITION_KEY)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(to_record).collect()
    }

    async fn upsert_many(&self, records: Vec<StatsRecord>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for record in &records {
            let count = i64::try_from(record.count).map_err(|_| {
                AppError::internal(
                    "Hit count out of range",
                    json!({ "alias": record.alias, "count": record.count }),
                )
            })?;

            sqlx::query(
                r#"
                INSERT INTO alias_stats
                    (partition_key, alias, count, last_update_end_time, last_result_captured)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (partition_key, alias)
                DO UPDATE SET
                    count = EXCLUDED.count,
                    last_update_end_time = EXCLUDED.last_update_end_time,
                    last_result_captured = EXCLUDED.last_result_captured
                "#,
            )
            .bind(&record.partition_key)
            .bind(&record.alias)
            .bind(count)
            .bind(record.last_update_end_time)
            .bind(record.last_result_captured)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete_many(&self, aliases: Vec<String>) -> Result<u64, AppError> {
        let result =
            sqlx::query("DELETE FROM alias_stats WHERE partition_key = $1 AND alias = ANY($2)")
                .bind(STATS_PARTITION_KEY)
                .bind(&aliases)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected())
    }
}
