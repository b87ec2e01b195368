//! Stats key-set reconciliation.
//!
//! Computes the stats collection that should exist for the current alias key set:
//! counters whose alias still exists are carried through unchanged, aliases
//! without a counter get a fresh one, and counters whose alias is gone are left
//! out and reported as orphaned. Nothing is written here; persisting the result
//! and deleting orphans are separate steps owned by
//! [`crate::application::services::StatsService`].

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::entities::StatsRecord;

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Existing counters that still reference a live alias, unchanged.
    pub kept: Vec<StatsRecord>,
    /// Fresh counters for aliases that had none.
    pub created: Vec<StatsRecord>,
    /// Stats keys whose alias no longer exists.
    pub orphaned: Vec<String>,
}

impl Reconciliation {
    /// The reconciled collection (`kept ∪ created`), ordered by alias.
    pub fn records(&self) -> Vec<StatsRecord> {
        let mut records: Vec<StatsRecord> =
            self.kept.iter().chain(self.created.iter()).cloned().collect();
        records.sort_by(|a, b| a.alias.cmp(&b.alias));
        records
    }

    pub fn is_converged(&self) -> bool {
        self.created.is_empty() && self.orphaned.is_empty()
    }
}

/// Reconciles the stats records against the alias key set.
///
/// If `stats` holds several records for one key, the first one is kept.
pub fn reconcile(alias_keys: &HashSet<String>, stats: Vec<StatsRecord>) -> Reconciliation {
    let mut kept: BTreeMap<String, StatsRecord> = BTreeMap::new();
    let mut orphaned: BTreeSet<String> = BTreeSet::new();

    for record in stats {
        if alias_keys.contains(&record.alias) {
            kept.entry(record.alias.clone()).or_insert(record);
        } else {
            orphaned.insert(record.alias);
        }
    }

    let mut missing: Vec<&String> = alias_keys
        .iter()
        .filter(|key| !kept.contains_key(key.as_str()))
        .collect();
    missing.sort();

    let created = missing
        .into_iter()
        .map(|key| StatsRecord::new(key.clone()))
        .collect();

    Reconciliation {
        kept: kept.into_values().collect(),
        created,
        orphaned: orphaned.into_iter().collect(),
    }
}
