//! Link creation, lookup and deletion service.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::application::services::url_validator::UrlValidator;
use crate::domain::entities::{Link, LinkId, NewLink};
use crate::domain::probe::RedirectProbe;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, validate_custom_code};

/// Default number of generated candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Parameters for generated short codes.
#[derive(Debug, Clone, Copy)]
pub struct CodePolicy {
    /// Length of generated codes.
    pub length: usize,
    /// Insert attempts with freshly generated codes before
    /// [`AppError::ExhaustedRetries`] is returned.
    pub max_attempts: u32,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Service for creating and managing links.
///
/// Uniqueness of short codes is delegated entirely to the store's atomic
/// [`LinkRepository::insert_unique`]; this service never checks for an
/// existing code before inserting, so concurrent writers cannot race between
/// a check and a write.
pub struct LinkService<L: LinkRepository + ?Sized, P: RedirectProbe + ?Sized> {
    link_repository: Arc<L>,
    validator: UrlValidator<P>,
    policy: CodePolicy,
}

impl<L: LinkRepository + ?Sized, P: RedirectProbe + ?Sized> LinkService<L, P> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, validator: UrlValidator<P>, policy: CodePolicy) -> Self {
        Self {
            link_repository,
            validator,
            policy,
        }
    }

    /// Creates a link to `destination_url`.
    ///
    /// # Flow
    ///
    /// 1. Check the requested code, if given (no I/O)
    /// 2. Validate the destination: URL syntax, then a probe that rejects
    ///    redirects
    /// 3. Insert with the requested code, or with generated codes until one
    ///    is free or [`CodePolicy::max_attempts`] is reached
    ///
    /// An empty `requested_code` counts as absent. A requested code that is
    /// already taken is never replaced by a generated one.
    ///
    /// Nothing is written before validation passes, so dropping the returned
    /// future at any point leaves no unvalidated link behind.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidFormat`] - destination is not an `http(s)://` URL
    /// - [`AppError::Validation`] - requested code has invalid characters or length
    /// - [`AppError::IsRedirectTarget`] - destination answers with a redirect
    /// - [`AppError::CodeInUse`] - requested code is taken
    /// - [`AppError::ExhaustedRetries`] - every generated code collided
    /// - [`AppError::StoreUnavailable`] - store failure
    pub async fn create_link(
        &self,
        destination_url: String,
        requested_code: Option<String>,
    ) -> Result<Link, AppError> {
        let requested_code = requested_code.filter(|code| !code.is_empty());
        if let Some(code) = &requested_code {
            validate_custom_code(code)?;
        }

        self.validator.validate(&destination_url).await?;

        let link = match requested_code {
            Some(code) => self.insert_requested(code, destination_url).await?,
            None => self.insert_generated(destination_url).await?,
        };

        info!(link_id = link.id, short_code = %link.short_code, "Link created");

        Ok(link)
    }

    /// Lists all links, newest first.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        Ok(self.link_repository.list_all().await?)
    }

    /// Deletes a link. Its access-log entries are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn delete_link(&self, id: LinkId) -> Result<(), AppError> {
        if !self.link_repository.delete_by_id(id).await? {
            return Err(link_not_found(id));
        }

        info!(link_id = id, "Link deleted");
        Ok(())
    }

    async fn insert_requested(
        &self,
        short_code: String,
        destination_url: String,
    ) -> Result<Link, AppError> {
        let new_link = NewLink {
            short_code: short_code.clone(),
            destination_url,
        };

        match self.link_repository.insert_unique(new_link).await {
            Ok(link) => Ok(link),
            Err(e) if e.is_uniqueness_violation() => Err(AppError::code_in_use(&short_code)),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_generated(&self, destination_url: String) -> Result<Link, AppError> {
        for attempt in 1..=self.policy.max_attempts {
            let new_link = NewLink {
                short_code: generate_code(self.policy.length),
                destination_url: destination_url.clone(),
            };
            let short_code = new_link.short_code.clone();

            match self.link_repository.insert_unique(new_link).await {
                Ok(link) => return Ok(link),
                Err(e) if e.is_uniqueness_violation() => {
                    warn!(attempt, short_code = %short_code, "Generated short code collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::exhausted_retries(self.policy.max_attempts))
    }
}

fn link_not_found(id: LinkId) -> AppError {
    AppError::not_found("Link not found", json!({ "id": id.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::probe::{MockRedirectProbe, ProbeOutcome};
    use crate::domain::repositories::{MockLinkRepository, StoreError};
    use chrono::Utc;

    fn probe_returning(outcome: ProbeOutcome) -> MockRedirectProbe {
        let mut probe = MockRedirectProbe::new();
        probe.expect_probe().returning(move |_| outcome.clone());
        probe
    }

    fn service(
        repo: MockLinkRepository,
        probe: MockRedirectProbe,
    ) -> LinkService<MockLinkRepository, MockRedirectProbe> {
        LinkService::new(
            Arc::new(repo),
            UrlValidator::new(Arc::new(probe)),
            CodePolicy::default(),
        )
    }

    fn stored(new_link: NewLink, id: LinkId) -> Link {
        Link::new(
            id,
            new_link.short_code,
            new_link.destination_url,
            Utc::now(),
            0,
        )
    }

    fn collision() -> StoreError {
        StoreError::UniquenessViolation {
            constraint: "links_short_code_key".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_link_with_generated_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique()
            .withf(|new_link| {
                new_link.short_code.len() == DEFAULT_CODE_LENGTH
                    && new_link.short_code.chars().all(|c| c.is_ascii_alphanumeric())
                    && new_link.destination_url == "https://example.com"
            })
            .times(1)
            .returning(|new_link| Ok(stored(new_link, 10)));
        repo.expect_find_by_code().times(0);

        let service = service(repo, probe_returning(ProbeOutcome::NotRedirect(200)));

        let link = service
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.id, 10);
        assert_eq!(link.click_count, 0);
        assert_eq!(link.destination_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_link_with_requested_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique()
            .withf(|new_link| new_link.short_code == "abc123")
            .times(1)
            .returning(|new_link| Ok(stored(new_link, 1)));

        let service = service(repo, probe_returning(ProbeOutcome::NotRedirect(200)));

        let link = service
            .create_link(
                "http://a.example".to_string(),
                Some("abc123".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(link.short_code, "abc123");
    }

    #[tokio::test]
    async fn test_empty_requested_code_generates_one() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique()
            .withf(|new_link| new_link.short_code.len() == DEFAULT_CODE_LENGTH)
            .times(1)
            .returning(|new_link| Ok(stored(new_link, 2)));

        let service = service(repo, probe_returning(ProbeOutcome::NotRedirect(200)));

        let result = service
            .create_link("https://example.com".to_string(), Some(String::new()))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_requested_code_in_use_is_not_replaced() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique()
            .times(1)
            .returning(|_| Err(collision()));

        let service = service(repo, probe_returning(ProbeOutcome::NotRedirect(200)));

        let err = service
            .create_link(
                "http://a.example".to_string(),
                Some("abc123".to_string()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CodeInUse { .. }));
        assert_eq!(err.to_error_info().details["short_code"], "abc123");
    }

    #[tokio::test]
    async fn test_generated_code_collision_retries() {
        let mut repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_insert_unique()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(collision()));
        repo.expect_insert_unique()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(stored(new_link, 3)));

        let service = service(repo, probe_returning(ProbeOutcome::NotRedirect(200)));

        let link = service
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.id, 3);
    }

    #[tokio::test]
    async fn test_generated_code_exhausts_retries() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique()
            .times(DEFAULT_MAX_ATTEMPTS as usize)
            .returning(|_| Err(collision()));

        let service = service(repo, probe_returning(ProbeOutcome::NotRedirect(200)));

        let err = service
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ExhaustedRetries { .. }));
        assert_eq!(err.to_error_info().details["attempts"], DEFAULT_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection reset".to_string())));

        let service = service(repo, probe_returning(ProbeOutcome::NotRedirect(200)));

        let err = service
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_invalid_format_touches_nothing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique().times(0);
        let mut probe = MockRedirectProbe::new();
        probe.expect_probe().times(0);

        let service = service(repo, probe);

        let err = service
            .create_link("ftp://x".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidFormat { .. }));
    }

    #[tokio::test]
    async fn test_redirect_destination_is_rejected() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique().times(0);

        let service = service(repo, probe_returning(ProbeOutcome::RedirectDetected(302)));

        let err = service
            .create_link("http://redirects.example".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::IsRedirectTarget { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_destination_is_accepted() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique()
            .times(1)
            .returning(|new_link| Ok(stored(new_link, 4)));

        let service = service(
            repo,
            probe_returning(ProbeOutcome::Unreachable("dns error".to_string())),
        );

        let result = service
            .create_link("https://unreachable.example".to_string(), None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_requested_code_skips_probe() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique().times(0);
        let mut probe = MockRedirectProbe::new();
        probe.expect_probe().times(0);

        let service = service(repo, probe);

        let err = service
            .create_link(
                "https://example.com".to_string(),
                Some("bad-code".to_string()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_custom_policy_length() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_unique()
            .withf(|new_link| new_link.short_code.len() == 10)
            .times(1)
            .returning(|new_link| Ok(stored(new_link, 5)));

        let service = LinkService::new(
            Arc::new(repo),
            UrlValidator::new(Arc::new(probe_returning(ProbeOutcome::NotRedirect(204)))),
            CodePolicy {
                length: 10,
                max_attempts: 1,
            },
        );

        assert!(
            service
                .create_link("https://example.com".to_string(), None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_delete_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_by_id()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_delete_by_id()
            .withf(|id| *id == 8)
            .times(1)
            .returning(|_| Ok(false));

        let service = service(repo, MockRedirectProbe::new());

        assert!(service.delete_link(7).await.is_ok());
        assert!(matches!(
            service.delete_link(8).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_links() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_all().times(1).returning(|| {
            Ok(vec![
                Link::new(2, "b".to_string(), "https://b.example".to_string(), Utc::now(), 3),
                Link::new(1, "a".to_string(), "https://a.example".to_string(), Utc::now(), 0),
            ])
        });

        let service = service(repo, MockRedirectProbe::new());

        let links = service.list_links().await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].short_code, "b");
    }
}
