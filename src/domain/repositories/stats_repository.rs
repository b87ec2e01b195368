//! Repository trait for per-alias stats records.

use crate::domain::entities::StatsRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the stats partition.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStatsRepository`] - process-local maps
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Returns every stats record in the stats partition, ordered by alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self) -> Result<Vec<StatsRecord>, AppError>;

    /// Inserts or overwrites each record, keyed by alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn upsert_many(&self, records: Vec<StatsRecord>) -> Result<(), AppError>;

    /// Deletes the stats records for the given aliases.
    ///
    /// Returns the number of rows removed; unknown aliases are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_many(&self, aliases: Vec<String>) -> Result<u64, AppError>;
}
