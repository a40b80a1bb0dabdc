//! Business logic services for the application layer.

pub mod link_service;
pub mod redirect_service;
pub mod stats_service;
pub mod url_validator;

pub use link_service::{CodePolicy, LinkService};
pub use redirect_service::RedirectService;
pub use stats_service::{LinkStats, StatsService};
pub use url_validator::UrlValidator;
