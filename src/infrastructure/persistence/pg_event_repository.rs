//! PostgreSQL implementation of the redirect event log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::redirect_event::RedirectEvent;
use crate::domain::repositories::{EventSummary, RedirectEventRepository};
use crate::error::AppError;

/// PostgreSQL repository for redirect events.
pub struct PgRedirectEventRepository {
    pool: Arc<PgPool>,
}

impl PgRedirectEventRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedirectEventRepository for PgRedirectEventRepository {
    async fn record(&self, event: RedirectEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO redirect_events (alias, partition_key, row_key, url, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&event.alias)
        .bind(&event.partition_key)
        .bind(&event.row_key)
        .bind(&event.url)
        .bind(event.occurred_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn summarize(
        &self,
        alias: &str,
        after: DateTime<Utc>,
        up_to: DateTime<Utc>,
    ) -> Result<EventSummary, AppError> {
        let (count, latest): (i64, Option<DateTime<Utc>>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), MAX(occurred_at)
            FROM redirect_events
            WHERE alias = $1 AND occurred_at > $2 AND occurred_at <= $3
            "#,
        )
        .bind(alias)
        .bind(after)
        .bind(up_to)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(EventSummary {
            count: count.max(0) as u64,
            latest,
        })
    }

    async fn purge_up_to(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM redirect_events WHERE occurred_at <= $1")
            .bind(cutoff)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
