//! CLI administration tool for link-redirector.
//!
//! Manages aliases and hit counters directly in the database, without going
//! through the HTTP endpoint or its shared secret.
//!
//! # Usage
//!
//! ```bash
//! # Publish or replace an alias
//! cargo run --bin admin -- alias set docs https://example.com/docs
//!
//! # Show one alias / all aliases
//! cargo run --bin admin -- alias get docs
//! cargo run --bin admin -- alias list
//!
//! # Show counters
//! cargo run --bin admin -- stats list
//!
//! # Run one stats pass now, deleting counters of removed aliases
//! cargo run --bin admin -- stats reconcile --prune
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or the `DB_*` components): PostgreSQL connection string

use link_redirector::application::services::StatsService;
use link_redirector::application::services::stats_service::EVENT_SETTLE_DELAY_SECS;
use link_redirector::config::{Config, StorageBackend};
use link_redirector::domain::entities::{AliasId, AliasRecord, UNSET_TIMESTAMP};
use link_redirector::domain::repositories::AliasRepository;
use link_redirector::infrastructure::persistence::{
    PgAliasRepository, PgRedirectEventRepository, PgStatsRepository,
};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// CLI tool for managing link-redirector.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage aliases
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },

    /// Inspect and reconcile hit counters
    Stats {
        #[command(subcommand)]
        action: StatsAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum AliasAction {
    /// Show the target of one alias
    Get { alias: String },

    /// Create or replace an alias
    Set {
        alias: String,
        url: String,

        /// Skip the overwrite confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all aliases
    List,
}

#[derive(Subcommand)]
enum StatsAction {
    /// List stored counters
    List,

    /// Run one stats pass now
    Reconcile {
        /// Delete counters whose alias no longer exists
        #[arg(long)]
        prune: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("The admin tool works on the database; set STORAGE_BACKEND=postgres");
    }
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Alias { action } => handle_alias_action(action, &pool).await?,
        Commands::Stats { action } => handle_stats_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_alias_action(action: AliasAction, pool: &PgPool) -> Result<()> {
    let repo = PgAliasRepository::new(Arc::new(pool.clone()));

    match action {
        AliasAction::Get { alias } => get_alias(&repo, &alias).await?,
        AliasAction::Set { alias, url, yes } => set_alias(&repo, &alias, url, yes).await?,
        AliasAction::List => list_aliases(&repo).await?,
    }

    Ok(())
}

async fn get_alias(repo: &PgAliasRepository, alias: &str) -> Result<()> {
    let alias = AliasId::parse(alias)?;

    match repo.get(&alias).await? {
        Some(record) => {
            println!("  {} → {}", record.alias.as_str().cyan(), record.url.bright_white());
        }
        None => {
            println!("{}", format!("  Alias '{}' not found", alias).yellow());
        }
    }

    Ok(())
}

/// Publishes an alias directly through the repository.
///
/// Asks before replacing an existing target (default: No) unless `--yes`.
async fn set_alias(
    repo: &PgAliasRepository,
    alias: &str,
    url: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Publish Alias".bright_blue().bold());
    println!();

    let alias = AliasId::parse(alias)?;
    let existing = repo.get(&alias).await?;

    println!("  Alias:  {}", alias.as_str().cyan());
    if let Some(ref current) = existing {
        println!("  Current: {}", current.url.bright_black());
    }
    println!("  Target: {}", url.bright_white());
    println!();

    if existing.is_some() && !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Replace the current target?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.upsert(AliasRecord::publish(existing, alias, url)).await?;

    println!("{}", "✅ Alias saved".green().bold());
    println!();

    Ok(())
}

/// Lists all aliases.
///
/// # Output Format
///
/// ```text
/// 📋 Aliases
///
///   Alias                Target
///   ──────────────────────────────────────────────────────────────
///   docs                 https://example.com/docs
/// ```
async fn list_aliases(repo: &PgAliasRepository) -> Result<()> {
    println!("{}", "📋 Aliases".bright_blue().bold());
    println!();

    let records = repo.list().await?;

    if records.is_empty() {
        println!("{}", "  No aliases found".yellow());
        return Ok(());
    }

    println!(
        "  {:<20} {}",
        "Alias".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        println!("  {:<20} {}", record.alias.as_str().cyan(), record.url);
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn handle_stats_action(action: StatsAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let service = StatsService::new(
        Arc::new(PgAliasRepository::new(pool.clone())),
        Arc::new(PgStatsRepository::new(pool.clone())),
        Arc::new(PgRedirectEventRepository::new(pool)),
    );

    match action {
        StatsAction::List => list_stats(&service).await?,
        StatsAction::Reconcile { prune, yes } => reconcile_stats(&service, prune, yes).await?,
    }

    Ok(())
}

async fn list_stats(service: &StatsService) -> Result<()> {
    println!("{}", "📊 Hit Counters".bright_blue().bold());
    println!();

    let records = service.list().await?;

    if records.is_empty() {
        println!("{}", "  No counters yet".yellow());
        println!();
        println!(
            "  Create them with: {} admin stats reconcile",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<20} {:>10} {:<20} {:<20}",
        "Alias".bright_white().bold(),
        "Hits".bright_white().bold(),
        "Counted up to".bright_white().bold(),
        "Last hit".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        let counted_up_to = if record.is_fresh() {
            "never".to_string()
        } else {
            record
                .last_update_end_time
                .format("%Y-%m-%d %H:%M")
                .to_string()
        };
        let last_hit = if record.last_result_captured == UNSET_TIMESTAMP {
            "never".to_string()
        } else {
            record
                .last_result_captured
                .format("%Y-%m-%d %H:%M")
                .to_string()
        };

        println!(
            "  {:<20} {:>10} {:<20} {:<20}",
            record.alias.cyan(),
            record.count.to_string().bright_green(),
            counted_up_to.bright_black(),
            last_hit.bright_black()
        );
    }

    println!();

    Ok(())
}

/// Runs one stats pass in explicit steps.
///
/// # Flow
///
/// 1. Reconcile counters against the alias set (read only)
/// 2. Show the plan
/// 3. Confirm (unless `--yes`)
/// 4. Fold redirect events into the counters, persist them and purge the
///    events they now cover
/// 5. Delete orphaned counters if `--prune` was given
async fn reconcile_stats(service: &StatsService, prune: bool, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔄 Reconcile Hit Counters".bright_blue().bold());
    println!();

    let reconciliation = service.reconcile().await?;

    if reconciliation.is_converged() {
        println!("{}", "  Counters match the alias set".green());
        println!();
    }

    println!(
        "  Kept:     {}",
        reconciliation.kept.len().to_string().bright_green()
    );
    println!(
        "  Created:  {}",
        reconciliation.created.len().to_string().bright_green()
    );
    for record in &reconciliation.created {
        println!("    + {}", record.alias.cyan());
    }
    println!(
        "  Orphaned: {}",
        reconciliation.orphaned.len().to_string().yellow()
    );
    for alias in &reconciliation.orphaned {
        let marker = if prune { "-".red() } else { "?".yellow() };
        println!("    {} {}", marker, alias.bright_black());
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Apply?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let window_end = Utc::now() - Duration::seconds(EVENT_SETTLE_DELAY_SECS);
    let (records, counted) = service
        .refresh_counts(reconciliation.records(), window_end)
        .await?;
    let purged_events = service.persist(records).await?;

    let pruned = if prune {
        service.prune(&reconciliation).await?
    } else {
        0
    };

    println!(
        "{}",
        format!(
            "✅ Counters updated ({} new hits, {} events purged, {} pruned)",
            counted, purged_events, pruned
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let aliases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM aliases")
                .fetch_one(pool)
                .await?;
            let events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM redirect_events")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Aliases:    {}", aliases.to_string().bright_green());
            println!("  Events:     {}", events.to_string().bright_green());
            println!();
        }
    }

    Ok(())
}
