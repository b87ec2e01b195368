//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`AliasRecord`] - An alias mapped to its target URL
//! - [`AliasId`] - Validated alias row key
//! - [`StatsRecord`] - Hit counter kept per alias
//!
//! Both record types live in a single fixed partition, [`ALIAS_PARTITION_KEY`]
//! and [`STATS_PARTITION_KEY`] respectively.

pub mod alias;
pub mod stats;

pub use alias::{ALIAS_PARTITION_KEY, AliasId, AliasRecord, ConcurrencyToken, RESERVED_ALIAS};
pub use stats::{STATS_PARTITION_KEY, StatsRecord, UNSET_TIMESTAMP};
