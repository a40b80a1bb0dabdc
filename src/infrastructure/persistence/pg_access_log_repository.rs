//! PostgreSQL implementation of the access-log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::store_support::{DEFAULT_OPERATION_TIMEOUT, bounded};
use crate::domain::entities::{AccessLogEntry, LinkId, NewAccessLogEntry};
use crate::domain::repositories::{AccessLogRepository, StoreError};

#[derive(sqlx::FromRow)]
struct AccessLogRow {
    id: i64,
    link_id: i64,
    accessed_at: DateTime<Utc>,
    client_ip: Option<String>,
}

impl From<AccessLogRow> for AccessLogEntry {
    fn from(r: AccessLogRow) -> Self {
        AccessLogEntry::new(r.id, r.link_id, r.accessed_at, r.client_ip)
    }
}

/// PostgreSQL repository for the `access_logs` table.
///
/// Lookups by link use the `access_logs_link_id_idx` index.
pub struct PgAccessLogRepository {
    pool: Arc<PgPool>,
    operation_timeout: Duration,
}

impl PgAccessLogRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Overrides the per-operation timeout.
    pub fn with_operation_timeout(mut self, operation_timeout: Duration) -> Self {
        self.operation_timeout = operation_timeout;
        self
    }
}

#[async_trait]
impl AccessLogRepository for PgAccessLogRepository {
    async fn append_log(&self, entry: NewAccessLogEntry) -> Result<AccessLogEntry, StoreError> {
        let row = bounded(
            self.operation_timeout,
            sqlx::query_as::<_, AccessLogRow>(
                r#"
                INSERT INTO access_logs (link_id, accessed_at, client_ip)
                VALUES ($1, $2, $3)
                RETURNING id, link_id, accessed_at, client_ip
                "#,
            )
            .bind(entry.link_id)
            .bind(entry.timestamp)
            .bind(&entry.client_ip)
            .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(row.into())
    }

    async fn find_logs_by_link(&self, link_id: LinkId) -> Result<Vec<AccessLogEntry>, StoreError> {
        let rows = bounded(
            self.operation_timeout,
            sqlx::query_as::<_, AccessLogRow>(
                r#"
                SELECT id, link_id, accessed_at, client_ip
                FROM access_logs
                WHERE link_id = $1
                ORDER BY accessed_at ASC, id ASC
                "#,
            )
            .bind(link_id)
            .fetch_all(self.pool.as_ref()),
        )
        .await?;

        Ok(rows.into_iter().map(AccessLogEntry::from).collect())
    }
}
