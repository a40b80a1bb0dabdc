//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    CodePolicy, LinkService, RedirectService, StatsService, UrlValidator,
};
use crate::domain::probe::RedirectProbe;
use crate::domain::repositories::{AccessLogRepository, LinkRepository};

pub type DynLinkService = LinkService<dyn LinkRepository, dyn RedirectProbe>;
pub type DynRedirectService = RedirectService<dyn LinkRepository, dyn AccessLogRepository>;
pub type DynStatsService = StatsService<dyn LinkRepository, dyn AccessLogRepository>;

/// Services and settings shared across requests.
///
/// Cloning is cheap; every field is reference counted or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub redirect_service: Arc<DynRedirectService>,
    pub stats_service: Arc<DynStatsService>,
    /// Used by the health check.
    pub link_repository: Arc<dyn LinkRepository>,
    /// When true, the client IP is read from forwarding headers.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services over the given store and probe.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        access_log_repository: Arc<dyn AccessLogRepository>,
        probe: Arc<dyn RedirectProbe>,
        policy: CodePolicy,
        behind_proxy: bool,
    ) -> Self {
        let link_service = LinkService::new(
            Arc::clone(&link_repository),
            UrlValidator::new(probe),
            policy,
        );
        let redirect_service = RedirectService::new(
            Arc::clone(&link_repository),
            Arc::clone(&access_log_repository),
        );
        let stats_service =
            StatsService::new(Arc::clone(&link_repository), access_log_repository);

        Self {
            link_service: Arc::new(link_service),
            redirect_service: Arc::new(redirect_service),
            stats_service: Arc::new(stats_service),
            link_repository,
            behind_proxy,
        }
    }
}
