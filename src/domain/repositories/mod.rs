//! Repository trait definitions for the domain layer.
//!
//! These traits are the data-access contract of the service. Concrete
//! implementations live in `crate::infrastructure::persistence`; mocks are
//! generated with `mockall` for unit tests.
//!
//! - [`LinkRepository`] - Link records with a unique short code
//! - [`AccessLogRepository`] - Append-only redirect log
//!
//! All operations report failures as [`StoreError`].

pub mod access_log_repository;
pub mod link_repository;
pub mod store_error;

pub use access_log_repository::AccessLogRepository;
pub use link_repository::LinkRepository;
pub use store_error::StoreError;

#[cfg(test)]
pub use access_log_repository::MockAccessLogRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
