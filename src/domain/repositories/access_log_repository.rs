//! Repository trait for the redirect access log.

use crate::domain::entities::{AccessLogEntry, LinkId, NewAccessLogEntry};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Append-only storage for [`AccessLogEntry`] records.
///
/// Entries are looked up through a secondary index on `link_id`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAccessLogRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessLogRepository: Send + Sync {
    /// Appends one entry. Durable once this returns `Ok`.
    async fn append_log(&self, entry: NewAccessLogEntry) -> Result<AccessLogEntry, StoreError>;

    /// Returns every entry of a link, oldest first.
    async fn find_logs_by_link(&self, link_id: LinkId) -> Result<Vec<AccessLogEntry>, StoreError>;
}
