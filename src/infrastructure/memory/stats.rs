use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{STATS_PARTITION_KEY, StatsRecord};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Stats records of the stats partition, keyed by alias.
#[derive(Default)]
pub struct InMemoryStatsRepository {
    records: RwLock<BTreeMap<String, StatsRecord>>,
}

impl InMemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn list(&self) -> Result<Vec<StatsRecord>, AppError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn upsert_many(&self, records: Vec<StatsRecord>) -> Result<(), AppError> {
        let mut stored = self.records.write().await;
        for mut record in records {
            record.partition_key = STATS_PARTITION_KEY.to_string();
            stored.insert(record.alias.clone(), record);
        }
        Ok(())
    }

    async fn delete_many(&self, aliases: Vec<String>) -> Result<u64, AppError> {
        let mut stored = self.records.write().await;
        let removed = aliases
            .iter()
            .filter(|alias| stored.remove(alias.as_str()).is_some())
            .count();
        Ok(removed as u64)
    }
}
