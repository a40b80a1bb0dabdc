//! HTTP server initialization and runtime setup.
//!
//! Handles store construction, migrations, probe setup, and the Axum server
//! lifecycle including graceful shutdown.

use crate::application::services::CodePolicy;
use crate::config::{Config, StoreBackend};
use crate::domain::probe::RedirectProbe;
use crate::domain::repositories::{AccessLogRepository, LinkRepository};
use crate::infrastructure::persistence::{
    InMemoryStore, PgAccessLogRepository, PgLinkRepository,
};
use crate::infrastructure::probe::HttpRedirectProbe;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Repositories built for the configured backend.
struct Store {
    links: Arc<dyn LinkRepository>,
    access_logs: Arc<dyn AccessLogRepository>,
    pool: Option<PgPool>,
}

/// Opens a PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the database cannot be reached.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies the embedded migrations.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

async fn build_store(config: &Config) -> Result<Store> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = connect_pool(config, database_url).await?;
            tracing::info!("Connected to database");

            migrate(&pool).await?;
            tracing::info!("Migrations applied");

            let shared = Arc::new(pool.clone());
            let links = PgLinkRepository::new(Arc::clone(&shared))
                .with_operation_timeout(config.store_timeout());
            let access_logs =
                PgAccessLogRepository::new(shared).with_operation_timeout(config.store_timeout());

            Ok(Store {
                links: Arc::new(links),
                access_logs: Arc::new(access_logs),
                pool: Some(pool),
            })
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data will be lost on restart");

            let store = Arc::new(InMemoryStore::new());

            Ok(Store {
                links: store.clone(),
                access_logs: store,
                pool: None,
            })
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The store (PostgreSQL pool + migrations, or in-memory)
/// - The destination redirect probe
/// - Link, redirect and statistics services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The probe HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;

    let probe: Arc<dyn RedirectProbe> = Arc::new(
        HttpRedirectProbe::new(config.probe_timeout())
            .context("Failed to build redirect probe client")?,
    );

    let policy = CodePolicy {
        length: config.code_length,
        max_attempts: config.code_max_attempts,
    };

    let state = AppState::new(
        store.links,
        store.access_logs,
        probe,
        policy,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(pool) = store.pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
