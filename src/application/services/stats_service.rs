//! Stats reconciliation and hit-count refresh service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::domain::entities::StatsRecord;
use crate::domain::reconciler::{Reconciliation, reconcile};
use crate::domain::repositories::{AliasRepository, RedirectEventRepository, StatsRepository};
use crate::error::AppError;

/// Grace period, in seconds, for events still queued in the event worker.
///
/// Counting windows end this long before the pass starts, so an event recorded
/// late still lands in the next window.
pub const EVENT_SETTLE_DELAY_SECS: i64 = 30;

/// Summary of one full stats pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRunReport {
    pub kept: usize,
    pub created: usize,
    pub orphaned: usize,
    /// Orphaned rows actually deleted (0 unless pruning was requested).
    pub pruned: u64,
    pub events_counted: u64,
    /// Events removed from the log after being folded into every counter.
    pub events_purged: u64,
    pub window_end: DateTime<Utc>,
}

/// Service keeping per-alias counters aligned with the alias set.
///
/// Each step is explicit: [`Self::reconcile`] only reads, [`Self::persist`] and
/// [`Self::prune`] write. [`Self::run_once`] chains them for the scheduler.
pub struct StatsService {
    alias_repository: Arc<dyn AliasRepository>,
    stats_repository: Arc<dyn StatsRepository>,
    event_repository: Arc<dyn RedirectEventRepository>,
}

impl StatsService {
    pub fn new(
        alias_repository: Arc<dyn AliasRepository>,
        stats_repository: Arc<dyn StatsRepository>,
        event_repository: Arc<dyn RedirectEventRepository>,
    ) -> Self {
        Self {
            alias_repository,
            stats_repository,
            event_repository,
        }
    }

    /// Reads both key sets and computes the reconciled stats collection.
    ///
    /// Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn reconcile(&self) -> Result<Reconciliation, AppError> {
        let alias_keys = self.alias_repository.list_keys().await?;
        let stats = self.stats_repository.list().await?;

        let reconciliation = reconcile(&alias_keys, stats);
        debug!(
            aliases = alias_keys.len(),
            kept = reconciliation.kept.len(),
            created = reconciliation.created.len(),
            orphaned = reconciliation.orphaned.len(),
            "Stats reconciled"
        );

        Ok(reconciliation)
    }

    /// Folds redirect events up to `window_end` into each counter.
    ///
    /// For every record the window is `(last_update_end_time, window_end]`.
    /// Records already past `window_end` are returned unchanged. Returns the
    /// updated records and the number of events counted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn refresh_counts(
        &self,
        records: Vec<StatsRecord>,
        window_end: DateTime<Utc>,
    ) -> Result<(Vec<StatsRecord>, u64), AppError> {
        let mut refreshed = Vec::with_capacity(records.len());
        let mut counted = 0u64;

        for mut record in records {
            if record.last_update_end_time >= window_end {
                refreshed.push(record);
                continue;
            }

            let summary = self
                .event_repository
                .summarize(&record.alias, record.last_update_end_time, window_end)
                .await?;

            record.count = record.count.saturating_add(summary.count);
            record.last_update_end_time = window_end;
            if let Some(latest) = summary.latest {
                record.last_result_captured = record.last_result_captured.max(latest);
            }

            counted = counted.saturating_add(summary.count);
            refreshed.push(record);
        }

        Ok((refreshed, counted))
    }

    /// Writes the given records to the stats store, then drops the events
    /// every one of them has already folded in.
    ///
    /// The purge cutoff is the oldest `last_update_end_time` among `records`,
    /// so no counter can still need a purged event. Returns the number of
    /// events purged. An empty batch writes and purges nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors. Events are only
    /// purged once the counters are stored.
    pub async fn persist(&self, records: Vec<StatsRecord>) -> Result<u64, AppError> {
        let Some(cutoff) = records.iter().map(|r| r.last_update_end_time).min() else {
            return Ok(0);
        };

        self.stats_repository.upsert_many(records).await?;

        let purged = self.event_repository.purge_up_to(cutoff).await?;
        debug!(purged, %cutoff, "Counted events purged");
        Ok(purged)
    }

    /// Deletes stats rows whose alias no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn prune(&self, reconciliation: &Reconciliation) -> Result<u64, AppError> {
        if reconciliation.orphaned.is_empty() {
            return Ok(0);
        }
        self.stats_repository
            .delete_many(reconciliation.orphaned.clone())
            .await
    }

    /// Lists stored counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list(&self) -> Result<Vec<StatsRecord>, AppError> {
        self.stats_repository.list().await
    }

    /// Runs a full pass: reconcile, refresh counts, persist (purging counted
    /// events), optionally prune.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors; the pass stops at the
    /// failing step.
    pub async fn run_once(&self, prune_orphans: bool) -> Result<StatsRunReport, AppError> {
        let window_end = Utc::now() - Duration::seconds(EVENT_SETTLE_DELAY_SECS);
        self.run_once_at(prune_orphans, window_end).await
    }

    /// Same as [`Self::run_once`] with an explicit window end.
    pub async fn run_once_at(
        &self,
        prune_orphans: bool,
        window_end: DateTime<Utc>,
    ) -> Result<StatsRunReport, AppError> {
        let reconciliation = self.reconcile().await?;

        let (records, events_counted) = self
            .refresh_counts(reconciliation.records(), window_end)
            .await?;
        let events_purged = self.persist(records).await?;

        let pruned = if prune_orphans {
            self.prune(&reconciliation).await?
        } else {
            0
        };

        let report = StatsRunReport {
            kept: reconciliation.kept.len(),
            created: reconciliation.created.len(),
            orphaned: reconciliation.orphaned.len(),
            pruned,
            events_counted,
            events_purged,
            window_end,
        };

        info!(
            kept = report.kept,
            created = report.created,
            orphaned = report.orphaned,
            pruned = report.pruned,
            events = report.events_counted,
            purged_events = report.events_purged,
            "Stats pass finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UNSET_TIMESTAMP;
    use crate::domain::repositories::{
        EventSummary, MockAliasRepository, MockRedirectEventRepository, MockStatsRepository,
    };
    use std::collections::HashSet;

    fn alias_repo(keys: &'static [&'static str]) -> MockAliasRepository {
        let mut mock = MockAliasRepository::new();
        mock.expect_list_keys()
            .returning(move || Ok(keys.iter().map(|k| k.to_string()).collect::<HashSet<_>>()));
        mock
    }

    fn counter(alias: &str, count: u64) -> StatsRecord {
        let mut record = StatsRecord::new(alias);
        record.count = count;
        record
    }

    fn no_events() -> MockRedirectEventRepository {
        let mut mock = MockRedirectEventRepository::new();
        mock.expect_summarize()
            .returning(|_, _, _| Ok(EventSummary::default()));
        mock.expect_purge_up_to().returning(|_| Ok(0));
        mock
    }

    #[tokio::test]
    async fn test_reconcile_does_not_write() {
        let mut stats_repo = MockStatsRepository::new();
        stats_repo
            .expect_list()
            .returning(|| Ok(vec![counter("a1", 5), counter("a4", 2)]));
        stats_repo.expect_upsert_many().times(0);
        stats_repo.expect_delete_many().times(0);

        let service = StatsService::new(
            Arc::new(alias_repo(&["a1", "a2", "a3"])),
            Arc::new(stats_repo),
            Arc::new(MockRedirectEventRepository::new()),
        );

        let reconciliation = service.reconcile().await.unwrap();
        let aliases: Vec<String> = reconciliation
            .records()
            .into_iter()
            .map(|r| r.alias)
            .collect();

        assert_eq!(aliases, vec!["a1", "a2", "a3"]);
        assert_eq!(reconciliation.orphaned, vec!["a4".to_string()]);
    }

    #[tokio::test]
    async fn test_run_once_persists_without_pruning() {
        let mut stats_repo = MockStatsRepository::new();
        stats_repo
            .expect_list()
            .returning(|| Ok(vec![counter("a1", 5), counter("a4", 2)]));
        stats_repo
            .expect_upsert_many()
            .withf(|records| {
                records.len() == 3
                    && records[0].alias == "a1"
                    && records[0].count == 5
                    && records[1].count == 0
                    && records[2].count == 0
            })
            .times(1)
            .returning(|_| Ok(()));
        stats_repo.expect_delete_many().times(0);

        let service = StatsService::new(
            Arc::new(alias_repo(&["a1", "a2", "a3"])),
            Arc::new(stats_repo),
            Arc::new(no_events()),
        );

        let report = service.run_once(false).await.unwrap();

        assert_eq!(report.kept, 1);
        assert_eq!(report.created, 2);
        assert_eq!(report.orphaned, 1);
        assert_eq!(report.pruned, 0);
    }

    #[tokio::test]
    async fn test_run_once_prunes_orphans_when_asked() {
        let mut stats_repo = MockStatsRepository::new();
        stats_repo
            .expect_list()
            .returning(|| Ok(vec![counter("a4", 2)]));
        stats_repo.expect_upsert_many().returning(|_| Ok(()));
        stats_repo
            .expect_delete_many()
            .withf(|aliases| aliases == &vec!["a4".to_string()])
            .times(1)
            .returning(|aliases| Ok(aliases.len() as u64));

        let service = StatsService::new(
            Arc::new(alias_repo(&["a1"])),
            Arc::new(stats_repo),
            Arc::new(no_events()),
        );

        let report = service.run_once(true).await.unwrap();

        assert_eq!(report.pruned, 1);
    }

    #[tokio::test]
    async fn test_refresh_counts_folds_window() {
        let window_end = Utc::now();
        let latest = window_end - Duration::minutes(1);

        let mut event_repo = MockRedirectEventRepository::new();
        event_repo
            .expect_summarize()
            .withf(move |alias, after, up_to| {
                alias == "a1" && *after == UNSET_TIMESTAMP && *up_to == window_end
            })
            .times(1)
            .returning(move |_, _, _| {
                Ok(EventSummary {
                    count: 3,
                    latest: Some(latest),
                })
            });

        let service = StatsService::new(
            Arc::new(MockAliasRepository::new()),
            Arc::new(MockStatsRepository::new()),
            Arc::new(event_repo),
        );

        let (records, counted) = service
            .refresh_counts(vec![counter("a1", 5)], window_end)
            .await
            .unwrap();

        assert_eq!(counted, 3);
        assert_eq!(records[0].count, 8);
        assert_eq!(records[0].last_update_end_time, window_end);
        assert_eq!(records[0].last_result_captured, latest);
    }

    #[tokio::test]
    async fn test_refresh_counts_skips_records_ahead_of_window() {
        let window_end = Utc::now();
        let mut ahead = counter("a1", 5);
        ahead.last_update_end_time = window_end + Duration::seconds(1);

        // No summarize expectation: a call would panic.
        let service = StatsService::new(
            Arc::new(MockAliasRepository::new()),
            Arc::new(MockStatsRepository::new()),
            Arc::new(MockRedirectEventRepository::new()),
        );

        let (records, counted) = service
            .refresh_counts(vec![ahead.clone()], window_end)
            .await
            .unwrap();

        assert_eq!(counted, 0);
        assert_eq!(records, vec![ahead]);
    }

    #[tokio::test]
    async fn test_refresh_without_events_keeps_capture_time() {
        let window_end = Utc::now();
        let service = StatsService::new(
            Arc::new(MockAliasRepository::new()),
            Arc::new(MockStatsRepository::new()),
            Arc::new(no_events()),
        );

        let (records, _) = service
            .refresh_counts(vec![StatsRecord::new("a1")], window_end)
            .await
            .unwrap();

        assert_eq!(records[0].count, 0);
        assert_eq!(records[0].last_update_end_time, window_end);
        assert_eq!(records[0].last_result_captured, UNSET_TIMESTAMP);
    }

    #[tokio::test]
    async fn test_persist_skips_empty_batch() {
        let mut stats_repo = MockStatsRepository::new();
        stats_repo.expect_upsert_many().times(0);

        let service = StatsService::new(
            Arc::new(MockAliasRepository::new()),
            Arc::new(stats_repo),
            Arc::new(MockRedirectEventRepository::new()),
        );

        service.persist(Vec::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_persist_purges_up_to_oldest_window() {
        let window_end = Utc::now();
        let older = window_end - Duration::minutes(5);
        let mut lagging = counter("a2", 1);
        lagging.last_update_end_time = older;
        let mut current = counter("a1", 4);
        current.last_update_end_time = window_end;

        let mut stats_repo = MockStatsRepository::new();
        stats_repo
            .expect_upsert_many()
            .times(1)
            .returning(|_| Ok(()));

        let mut event_repo = MockRedirectEventRepository::new();
        event_repo
            .expect_purge_up_to()
            .withf(move |cutoff| *cutoff == older)
            .times(1)
            .returning(|_| Ok(7));

        let service = StatsService::new(
            Arc::new(MockAliasRepository::new()),
            Arc::new(stats_repo),
            Arc::new(event_repo),
        );

        let purged = service.persist(vec![current, lagging]).await.unwrap();

        assert_eq!(purged, 7);
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_events() {
        let mut stats_repo = MockStatsRepository::new();
        stats_repo
            .expect_upsert_many()
            .returning(|_| Err(AppError::internal("write failed", serde_json::json!({}))));

        let mut event_repo = MockRedirectEventRepository::new();
        event_repo.expect_purge_up_to().times(0);

        let service = StatsService::new(
            Arc::new(MockAliasRepository::new()),
            Arc::new(stats_repo),
            Arc::new(event_repo),
        );

        let result = service.persist(vec![counter("a1", 1)]).await;

        assert!(result.is_err());
    }
}
