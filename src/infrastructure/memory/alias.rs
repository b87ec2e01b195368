use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

use crate::domain::entities::{ALIAS_PARTITION_KEY, AliasId, AliasRecord};
use crate::domain::repositories::AliasRepository;
use crate::error::AppError;

type Key = (String, String);

/// Alias records keyed by `(partition_key, alias)`.
#[derive(Default)]
pub struct InMemoryAliasRepository {
    records: RwLock<BTreeMap<Key, AliasRecord>>,
}

impl InMemoryAliasRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AliasRepository for InMemoryAliasRepository {
    async fn get(&self, alias: &AliasId) -> Result<Option<AliasRecord>, AppError> {
        let key = (ALIAS_PARTITION_KEY.to_string(), alias.as_str().to_string());
        Ok(self.records.read().await.get(&key).cloned())
    }

    async fn upsert(&self, record: AliasRecord) -> Result<(), AppError> {
        let key = (record.partition_key.clone(), record.row_key().to_string());
        self.records.write().await.insert(key, record);
        Ok(())
    }

    async fn list_keys(&self) -> Result<HashSet<String>, AppError> {
        Ok(self
            .records
            .read()
            .await
            .keys()
            .filter(|(pk, _)| pk == ALIAS_PARTITION_KEY)
            .map(|(_, alias)| alias.clone())
            .collect())
    }

    async fn list(&self) -> Result<Vec<AliasRecord>, AppError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.partition_key == ALIAS_PARTITION_KEY)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.list_keys().await?.len() as i64)
    }
}
