//! CLI administration tool for shortlink.
//!
//! Provides commands for inspecting and deleting links, viewing per-link
//! statistics, and performing database operations without HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List all links
//! cargo run --bin admin -- links list
//!
//! # Delete a link (asks for confirmation)
//! cargo run --bin admin -- links delete 42
//!
//! # Show click count and access history of a link
//! cargo run --bin admin -- stats 42
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use shortlink::config::{Config, mask_connection_string};
use shortlink::domain::entities::LinkId;
use shortlink::domain::repositories::{AccessLogRepository, LinkRepository};
use shortlink::infrastructure::persistence::{PgAccessLogRepository, PgLinkRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show click count and access history of a link
    Stats {
        /// Link id
        id: LinkId,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List all links, newest first
    List,

    /// Delete a link (its access history is kept)
    Delete {
        /// Link id
        id: LinkId,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                mask_connection_string(&database_url)
            )
        })?;

    let result = match cli.command {
        Commands::Links { action } => handle_links_action(action, &pool).await,
        Commands::Stats { id } => show_stats(id, &pool).await,
        Commands::Db { action } => handle_db_action(action, &pool).await,
    };

    pool.close().await;
    result
}

/// Dispatches link management commands.
async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match action {
        LinksAction::List => list_links(&repo).await,
        LinksAction::Delete { id, yes } => delete_link(&repo, id, yes).await,
    }
}

/// Lists all links.
///
/// # Output Format
///
/// ```text
/// Links
///
///   ID    Code       Clicks   Created            Destination
///   ──────────────────────────────────────────────────────────────────
///   2     promo2025  14       2025-01-16 14:20   https://example.com/sale
///   1     aB3xY9     3        2025-01-15 10:30   https://example.com
/// ```
async fn list_links(repo: &PgLinkRepository) -> Result<()> {
    println!("{}", "Links".bright_blue().bold());
    println!();

    let links = repo
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<10} {:<8} {:<18} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<5} {:<10} {:<8} {:<18} {}",
            link.id.to_string().bright_black(),
            link.short_code.cyan(),
            link.click_count.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.destination_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No) unless `--yes` is given.
async fn delete_link(repo: &PgLinkRepository, id: LinkId, skip_confirm: bool) -> Result<()> {
    let link = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("  Code:        {}", link.short_code.cyan());
    println!("  Destination: {}", link.destination_url);
    println!("  Clicks:      {}", link.click_count);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    if deleted {
        println!("{}", "Link deleted".green().bold());
    } else {
        println!("{}", "Link was already deleted".yellow());
    }

    Ok(())
}

/// Prints the click count and access history of a link, oldest first.
async fn show_stats(id: LinkId, pool: &PgPool) -> Result<()> {
    let shared = Arc::new(pool.clone());
    let links = PgLinkRepository::new(Arc::clone(&shared));
    let logs = PgAccessLogRepository::new(shared);

    let link = links
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    let history = logs
        .find_logs_by_link(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "{} {}",
        "Statistics for".bright_blue().bold(),
        link.short_code.cyan().bold()
    );
    println!();
    println!("  Destination: {}", link.destination_url);
    println!(
        "  Clicks:      {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!(
        "  Log entries: {}",
        history.len().to_string().bright_green().bold()
    );

    if history.len() as i64 != link.click_count {
        println!(
            "  {}",
            "Click count differs from the access log; the log is authoritative".yellow()
        );
    }

    if !history.is_empty() {
        println!();
        for entry in &history {
            println!(
                "  {}  {}",
                entry
                    .timestamp
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .bright_black(),
                entry.client_ip.as_deref().unwrap_or("-")
            );
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "Applying migrations...".bright_blue());

            shortlink::server::migrate(pool).await?;

            println!("{}", "Migrations applied".green().bold());
        }
    }

    Ok(())
}
