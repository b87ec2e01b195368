//! In-process repository implementations.
//!
//! Backed by `tokio::sync::RwLock` maps. Selected with `STORAGE_BACKEND=memory`
//! for local runs, and used by the integration tests. Contents are lost on
//! restart.

mod alias;
mod event;
mod stats;

pub use alias::InMemoryAliasRepository;
pub use event::InMemoryRedirectEventRepository;
pub use stats::InMemoryStatsRepository;
