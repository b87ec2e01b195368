//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, worker spawning, and Axum server lifecycle.

use crate::api::middleware::rate_limit;
use crate::application::scheduler::run_stats_scheduler;
use crate::application::services::{AliasService, StatsService};
use crate::config::{Config, StorageBackend};
use crate::domain::authorization::WriteSecret;
use crate::domain::event_worker::run_event_worker;
use crate::domain::observer::ChannelObserver;
use crate::domain::redirect_event::RedirectEvent;
use crate::domain::repositories::{AliasRepository, RedirectEventRepository, StatsRepository};
use crate::domain::resolver::AliasResolver;
use crate::infrastructure::memory::{
    InMemoryAliasRepository, InMemoryRedirectEventRepository, InMemoryStatsRepository,
};
use crate::infrastructure::persistence::{
    PgAliasRepository, PgRedirectEventRepository, PgStatsRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// The three stores behind the service, for whichever backend is configured.
#[derive(Clone)]
pub struct Repositories {
    pub aliases: Arc<dyn AliasRepository>,
    pub stats: Arc<dyn StatsRepository>,
    pub events: Arc<dyn RedirectEventRepository>,
}

impl Repositories {
    /// Fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            aliases: Arc::new(InMemoryAliasRepository::new()),
            stats: Arc::new(InMemoryStatsRepository::new()),
            events: Arc::new(InMemoryRedirectEventRepository::new()),
        }
    }
}

/// Opens the configured storage backend.
///
/// For PostgreSQL this connects the pool and applies the embedded migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_storage(config: &Config) -> Result<Repositories> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; aliases are lost on restart");
            Ok(Repositories::in_memory())
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate")?;

            let pool = Arc::new(pool);
            Ok(Repositories {
                aliases: Arc::new(PgAliasRepository::new(pool.clone())),
                stats: Arc::new(PgStatsRepository::new(pool.clone())),
                events: Arc::new(PgRedirectEventRepository::new(pool)),
            })
        }
    }
}

/// Wires services and state on top of `repositories`.
///
/// Returns the state together with the receiving end of the redirect event
/// queue, which the caller hands to [`run_event_worker`].
pub fn build_state(
    config: &Config,
    repositories: &Repositories,
) -> (AppState, mpsc::Receiver<RedirectEvent>) {
    let (event_tx, event_rx) = mpsc::channel(config.event_queue_capacity);

    let resolver = AliasResolver::new(WriteSecret::new(config.write_secret.as_deref()));
    let alias_service = Arc::new(AliasService::new(
        repositories.aliases.clone(),
        resolver,
        Arc::new(ChannelObserver::new(event_tx.clone())),
    ));
    let stats_service = Arc::new(StatsService::new(
        repositories.aliases.clone(),
        repositories.stats.clone(),
        repositories.events.clone(),
    ));

    (
        AppState::new(alias_service, stats_service, event_tx),
        event_rx,
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL with migrations, or in-memory)
/// - Background redirect event worker
/// - Periodic stats scheduler
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Storage initialization fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = connect_storage(&config).await?;
    let (state, event_rx) = build_state(&config, &repositories);

    if !state.alias_service.writes_enabled() {
        tracing::warn!("X_AUTHORIZATION is not set; every POST/PUT will be rejected");
    }

    tokio::spawn(run_event_worker(event_rx, repositories.events.clone()));
    tracing::info!("Redirect event worker started");

    tokio::spawn(run_stats_scheduler(
        state.stats_service.clone(),
        Duration::from_secs(config.stats_interval_seconds),
        config.stats_prune_orphans,
    ));

    let limiter = rate_limit::layer(config.rate_limit_per_second, config.rate_limit_burst)?;
    let app = app_router(state, limiter);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
