//! Repository trait for link records.

use crate::domain::entities::{Link, LinkId, NewLink};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Repository interface for link records keyed by short code.
///
/// The store owns the uniqueness of `short_code`: [`insert_unique`] must be a
/// single atomic operation that either inserts or reports
/// [`StoreError::UniquenessViolation`]. Callers never pre-check existence.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
///
/// [`insert_unique`]: LinkRepository::insert_unique
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `click_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniquenessViolation`] if `short_code` is taken.
    /// Returns [`StoreError::Unavailable`] or [`StoreError::Timeout`] on backend failure.
    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its short code.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, StoreError>;

    /// Finds a link by its store-assigned identifier.
    async fn find_by_id(&self, id: LinkId) -> Result<Option<Link>, StoreError>;

    /// Deletes a link. Returns `Ok(false)` if no link had this id.
    ///
    /// Access-log entries of the link are kept.
    async fn delete_by_id(&self, id: LinkId) -> Result<bool, StoreError>;

    /// Atomically adds `by` to the link's `click_count`.
    ///
    /// This is a relative update executed by the store, never a
    /// read-modify-write from the caller. Incrementing a missing link is a no-op.
    async fn increment_clicks(&self, id: LinkId, by: i64) -> Result<(), StoreError>;

    /// Lists all links, newest first.
    async fn list_all(&self) -> Result<Vec<Link>, StoreError>;

    /// Checks that the backend answers.
    async fn ping(&self) -> Result<(), StoreError>;
}
