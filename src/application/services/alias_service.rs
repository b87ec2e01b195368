//! Alias resolution service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::observer::RedirectObserver;
use crate::domain::repositories::AliasRepository;
use crate::domain::resolver::{AliasRequest, AliasResolver, ResolveError, Resolution};
use crate::error::AppError;

/// Runs the alias resolver against storage.
///
/// # Request Flow
///
/// 1. Validate the alias and, on writes, the shared secret (no storage access)
/// 2. Look up the stored record
/// 3. Let [`AliasResolver`] decide the outcome
/// 4. Upsert the record on writes; notify the observer on redirects
///
/// Storage failures propagate as [`AppError::Internal`] without retry.
pub struct AliasService {
    repository: Arc<dyn AliasRepository>,
    resolver: AliasResolver,
    observer: Arc<dyn RedirectObserver>,
}

impl AliasService {
    pub fn new(
        repository: Arc<dyn AliasRepository>,
        resolver: AliasResolver,
        observer: Arc<dyn RedirectObserver>,
    ) -> Self {
        Self {
            repository,
            resolver,
            observer,
        }
    }

    /// Returns true if the configured secret can authorize writes.
    pub fn writes_enabled(&self) -> bool {
        self.resolver.writes_enabled()
    }

    /// Resolves one alias request end to end.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty or reserved alias
    /// - [`AppError::Unauthorized`] for a write without the shared secret
    /// - [`AppError::NotFound`] for a read of an unknown alias
    /// - [`AppError::Internal`] on storage errors
    pub async fn handle(&self, request: AliasRequest<'_>) -> Result<Resolution, AppError> {
        let alias = self.resolver.precheck(&request).map_err(rejected)?;

        let existing = self.repository.get(&alias).await?;

        let resolution = self
            .resolver
            .resolve(&request, existing)
            .map_err(rejected)?;

        match &resolution {
            Resolution::Write {
                record, created, ..
            } => {
                self.repository.upsert(record.clone()).await?;
                metrics::counter!("alias_writes_total").increment(1);
                info!(alias = %record.alias, created = *created, "Alias published");
            }
            Resolution::Redirect { event, .. } => {
                metrics::counter!("alias_redirects_total").increment(1);
                info!(
                    event = "redirect",
                    alias = %event.alias,
                    pk = %event.partition_key,
                    rk = %event.row_key,
                    url = %event.url,
                    "Redirect"
                );

                if let Err(e) = self.observer.observe(event.clone()) {
                    metrics::counter!("redirect_events_dropped_total").increment(1);
                    warn!(alias = %event.alias, error = %e, "Redirect event dropped");
                }
            }
        }

        Ok(resolution)
    }

    /// Probes the alias store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}

fn rejected(e: ResolveError) -> AppError {
    let reason = match &e {
        ResolveError::InvalidAlias { .. } => "invalid_alias",
        ResolveError::Unauthorized { .. } => "unauthorized",
        ResolveError::NotFound { .. } => "not_found",
    };
    metrics::counter!("alias_rejections_total", "reason" => reason).increment(1);
    debug!(reason, "Alias request rejected: {}", e);
    e.into()
}
