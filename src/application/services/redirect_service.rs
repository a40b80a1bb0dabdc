//! Redirect resolution and click accounting.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, error};

use crate::domain::entities::{LinkId, NewAccessLogEntry};
use crate::domain::repositories::{AccessLogRepository, LinkRepository};
use crate::error::AppError;

/// Resolves short codes and accounts for every served redirect.
///
/// # Recording contract
///
/// For each resolved code, one access-log entry is appended and then the
/// link's `click_count` is incremented by one. The two writes are separate:
///
/// - If appending the log entry fails, the request fails and no redirect is
///   served.
/// - If the increment fails afterwards, the entry is kept and the redirect is
///   still served. The access log is the source of truth; `click_count` may
///   lag behind it.
///
/// Both writes run on a detached task, so a client disconnecting mid-request
/// cannot leave a log entry without its increment attempt.
pub struct RedirectService<L, A>
where
    L: LinkRepository + ?Sized + 'static,
    A: AccessLogRepository + ?Sized + 'static,
{
    link_repository: Arc<L>,
    access_log_repository: Arc<A>,
}

impl<L, A> RedirectService<L, A>
where
    L: LinkRepository + ?Sized + 'static,
    A: AccessLogRepository + ?Sized + 'static,
{
    pub fn new(link_repository: Arc<L>, access_log_repository: Arc<A>) -> Self {
        Self {
            link_repository,
            access_log_repository,
        }
    }

    /// Looks up `short_code`, records the click and returns the destination URL.
    ///
    /// Unknown codes write nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::StoreUnavailable`] if the lookup or the log append fails.
    pub async fn resolve_and_record(
        &self,
        short_code: &str,
        client_ip: Option<String>,
    ) -> Result<String, AppError> {
        let link = self
            .link_repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Short link not found",
                    json!({ "short_code": short_code }),
                )
            })?;

        let links = Arc::clone(&self.link_repository);
        let logs = Arc::clone(&self.access_log_repository);
        let link_id = link.id;

        let recording = tokio::spawn(async move {
            record_click(links.as_ref(), logs.as_ref(), link_id, client_ip).await
        });

        recording.await.map_err(|e| {
            AppError::internal(
                "Click recording task failed",
                json!({ "reason": e.to_string() }),
            )
        })??;

        debug!(link_id, short_code, "Redirect recorded");

        Ok(link.destination_url)
    }
}

async fn record_click<L, A>(
    links: &L,
    logs: &A,
    link_id: LinkId,
    client_ip: Option<String>,
) -> Result<(), AppError>
where
    L: LinkRepository + ?Sized,
    A: AccessLogRepository + ?Sized,
{
    logs.append_log(NewAccessLogEntry {
        link_id,
        timestamp: Utc::now(),
        client_ip,
    })
    .await?;

    if let Err(e) = links.increment_clicks(link_id, 1).await {
        error!(link_id, error = %e, "Failed to increment click count, access log entry kept");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AccessLogEntry, Link};
    use crate::domain::repositories::{MockAccessLogRepository, MockLinkRepository, StoreError};

    fn test_link() -> Link {
        Link::new(
            42,
            "abc123".to_string(),
            "https://example.com/target".to_string(),
            Utc::now(),
            0,
        )
    }

    fn logged(entry: NewAccessLogEntry) -> AccessLogEntry {
        AccessLogEntry::new(1, entry.link_id, entry.timestamp, entry.client_ip)
    }

    #[tokio::test]
    async fn test_resolve_records_log_then_increments() {
        let mut links = MockLinkRepository::new();
        let mut logs = MockAccessLogRepository::new();
        let mut seq = mockall::Sequence::new();

        links
            .expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(test_link())));
        logs.expect_append_log()
            .withf(|entry| {
                entry.link_id == 42 && entry.client_ip.as_deref() == Some("10.0.0.1")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|entry| Ok(logged(entry)));
        links
            .expect_increment_clicks()
            .withf(|id, by| *id == 42 && *by == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let service = RedirectService::new(Arc::new(links), Arc::new(logs));

        let destination = service
            .resolve_and_record("abc123", Some("10.0.0.1".to_string()))
            .await
            .unwrap();

        assert_eq!(destination, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_unknown_code_writes_nothing() {
        let mut links = MockLinkRepository::new();
        let mut logs = MockAccessLogRepository::new();

        links.expect_find_by_code().times(1).returning(|_| Ok(None));
        links.expect_increment_clicks().times(0);
        logs.expect_append_log().times(0);

        let service = RedirectService::new(Arc::new(links), Arc::new(logs));

        let err = service
            .resolve_and_record("doesnotexist", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_log_failure_fails_request_without_increment() {
        let mut links = MockLinkRepository::new();
        let mut logs = MockAccessLogRepository::new();

        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(test_link())));
        logs.expect_append_log()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("disk full".to_string())));
        links.expect_increment_clicks().times(0);

        let service = RedirectService::new(Arc::new(links), Arc::new(logs));

        let err = service.resolve_and_record("abc123", None).await.unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_increment_failure_still_serves_redirect() {
        let mut links = MockLinkRepository::new();
        let mut logs = MockAccessLogRepository::new();

        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(test_link())));
        logs.expect_append_log()
            .times(1)
            .returning(|entry| Ok(logged(entry)));
        links
            .expect_increment_clicks()
            .times(1)
            .returning(|_, _| Err(StoreError::Timeout(std::time::Duration::from_secs(5))));

        let service = RedirectService::new(Arc::new(links), Arc::new(logs));

        let destination = service.resolve_and_record("abc123", None).await.unwrap();
        assert_eq!(destination, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_lookup_failure_is_store_unavailable() {
        let mut links = MockLinkRepository::new();
        let mut logs = MockAccessLogRepository::new();

        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));
        logs.expect_append_log().times(0);

        let service = RedirectService::new(Arc::new(links), Arc::new(logs));

        let err = service.resolve_and_record("abc123", None).await.unwrap_err();
        assert_eq!(err.code(), "store_unavailable");
        assert_eq!(err.status().as_u16(), 500);
    }
}
