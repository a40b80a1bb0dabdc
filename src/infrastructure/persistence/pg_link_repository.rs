//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::store_support::{DEFAULT_OPERATION_TIMEOUT, bounded};
use crate::domain::entities::{Link, LinkId, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    destination_url: String,
    created_at: DateTime<Utc>,
    click_count: i64,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.short_code,
            r.destination_url,
            r.created_at,
            r.click_count,
        )
    }
}

/// PostgreSQL repository for link records.
///
/// Short code uniqueness is enforced by the `links_short_code_key` constraint.
/// Every statement is bounded by the operation timeout.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    operation_timeout: Duration,
}

impl PgLinkRepository {
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
impl LinkRepository for PgLinkRepository {
    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let row = bounded(
            self.operation_timeout,
            sqlx::query_as::<_, LinkRow>(
                r#"
                INSERT INTO links (short_code, destination_url)
                VALUES ($1, $2)
                RETURNING id, short_code, destination_url, created_at, click_count
                "#,
            )
            .bind(&new_link.short_code)
            .bind(&new_link.destination_url)
            .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, StoreError> {
        let row = bounded(
            self.operation_timeout,
            sqlx::query_as::<_, LinkRow>(
                r#"
                SELECT id, short_code, destination_url, created_at, click_count
                FROM links
                WHERE short_code = $1
                "#,
            )
            .bind(short_code)
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_id(&self, id: LinkId) -> Result<Option<Link>, StoreError> {
        let row = bounded(
            self.operation_timeout,
            sqlx::query_as::<_, LinkRow>(
                r#"
                SELECT id, short_code, destination_url, created_at, click_count
                FROM links
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row.map(Link::from))
    }

    async fn delete_by_id(&self, id: LinkId) -> Result<bool, StoreError> {
        let result = bounded(
            self.operation_timeout,
            sqlx::query("DELETE FROM links WHERE id = $1")
                .bind(id)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_clicks(&self, id: LinkId, by: i64) -> Result<(), StoreError> {
        bounded(
            self.operation_timeout,
            sqlx::query("UPDATE links SET click_count = click_count + $2 WHERE id = $1")
                .bind(id)
                .bind(by)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Link>, StoreError> {
        let rows = bounded(
            self.operation_timeout,
            sqlx::query_as::<_, LinkRow>(
                r#"
                SELECT id, short_code, destination_url, created_at, click_count
                FROM links
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .fetch_all(self.pool.as_ref()),
        )
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        bounded(
            self.operation_timeout,
            sqlx::query("SELECT 1").execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }
}
