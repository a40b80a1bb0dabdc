//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! expose a small API to HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation with collision handling, listing, deletion
//! - [`services::redirect_service::RedirectService`] - Redirect resolution and click accounting
//! - [`services::stats_service::StatsService`] - Per-link click history
//! - [`services::url_validator::UrlValidator`] - Destination URL checks

pub mod services;
