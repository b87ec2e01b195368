#![allow(dead_code)]

use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use link_redirector::api::handlers::health_handler;
use link_redirector::api::routes::alias_routes;
use link_redirector::application::services::{AliasService, StatsService};
use link_redirector::domain::authorization::WriteSecret;
use link_redirector::domain::entities::{AliasId, AliasRecord};
use link_redirector::domain::observer::ChannelObserver;
use link_redirector::domain::redirect_event::RedirectEvent;
use link_redirector::domain::repositories::AliasRepository;
use link_redirector::domain::resolver::AliasResolver;
use link_redirector::infrastructure::memory::{
    InMemoryAliasRepository, InMemoryRedirectEventRepository, InMemoryStatsRepository,
};
use link_redirector::state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const TEST_SECRET: &str = "test-write-secret";

/// State plus handles on the in-memory stores behind it.
pub struct TestContext {
    pub state: AppState,
    pub events: mpsc::Receiver<RedirectEvent>,
    pub aliases: Arc<InMemoryAliasRepository>,
    pub stats: Arc<InMemoryStatsRepository>,
    pub event_log: Arc<InMemoryRedirectEventRepository>,
}

pub fn create_test_state() -> TestContext {
    create_test_state_with_secret(Some(TEST_SECRET))
}

pub fn create_test_state_with_secret(secret: Option<&str>) -> TestContext {
    let (tx, rx) = mpsc::channel(100);

    let aliases = Arc::new(InMemoryAliasRepository::new());
    let stats = Arc::new(InMemoryStatsRepository::new());
    let event_log = Arc::new(InMemoryRedirectEventRepository::new());

    let alias_service = Arc::new(AliasService::new(
        aliases.clone(),
        AliasResolver::new(WriteSecret::new(secret)),
        Arc::new(ChannelObserver::new(tx.clone())),
    ));
    let stats_service = Arc::new(StatsService::new(
        aliases.clone(),
        stats.clone(),
        event_log.clone(),
    ));

    TestContext {
        state: AppState::new(alias_service, stats_service, tx),
        events: rx,
        aliases,
        stats,
        event_log,
    }
}

/// Alias and health routes without rate limiting.
pub fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .merge(alias_routes())
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

pub async fn create_test_alias(ctx: &TestContext, alias: &str, url: &str) {
    ctx.aliases
        .upsert(AliasRecord::new(AliasId::parse(alias).unwrap(), url))
        .await
        .unwrap();
}
