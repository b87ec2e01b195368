//! Repository trait for alias records.

use std::collections::HashSet;

use crate::domain::entities::{AliasId, AliasRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the alias partition.
///
/// Writes are unconditional: there is no precondition on prior state and the
/// last upsert to complete wins.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAliasRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryAliasRepository`] - process-local maps
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AliasRepository: Send + Sync {
    /// Point lookup of an alias in the alias partition.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get(&self, alias: &AliasId) -> Result<Option<AliasRecord>, AppError>;

    /// Inserts or overwrites a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn upsert(&self, record: AliasRecord) -> Result<(), AppError>;

    /// Returns every alias row key in the alias partition.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_keys(&self) -> Result<HashSet<String>, AppError>;

    /// Returns every alias record, ordered by alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self) -> Result<Vec<AliasRecord>, AppError>;

    /// Counts alias records. Also used as a storage liveness probe.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;
}
