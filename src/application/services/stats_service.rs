//! Per-link click statistics.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{AccessLogEntry, Link, LinkId};
use crate::domain::repositories::{AccessLogRepository, LinkRepository};
use crate::error::AppError;

/// Click statistics of a single link.
///
/// `click_count` comes from the link record and `history` from the access
/// log, so the two may disagree when an increment failed; the history is
/// authoritative.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub link: Link,
    pub click_count: i64,
    pub history: Vec<AccessLogEntry>,
}

/// Service for reading per-link statistics.
pub struct StatsService<L: LinkRepository + ?Sized, A: AccessLogRepository + ?Sized> {
    link_repository: Arc<L>,
    access_log_repository: Arc<A>,
}

impl<L: LinkRepository + ?Sized, A: AccessLogRepository + ?Sized> StatsService<L, A> {
    /// Creates a new statistics service.
    pub fn new(link_repository: Arc<L>, access_log_repository: Arc<A>) -> Self {
        Self {
            link_repository,
            access_log_repository,
        }
    }

    /// Returns the click count and full access history of a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::StoreUnavailable`] on store failure.
    pub async fn get_link_stats(&self, id: LinkId) -> Result<LinkStats, AppError> {
        let link = self
            .link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id.to_string() })))?;

        let history = self.access_log_repository.find_logs_by_link(link.id).await?;

        Ok(LinkStats {
            click_count: link.click_count,
            link,
            history,
        })
    }
}
