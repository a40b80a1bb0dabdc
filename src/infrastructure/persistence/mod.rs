//! Store implementations.
//!
//! Concrete implementations of the domain repository traits.
//!
//! # Backends
//!
//! - [`PgLinkRepository`] / [`PgAccessLogRepository`] - PostgreSQL via SQLx
//! - [`InMemoryStore`] - Process-local store for development and tests

pub mod memory_store;
pub mod pg_access_log_repository;
pub mod pg_link_repository;
pub mod store_support;

pub use memory_store::InMemoryStore;
pub use pg_access_log_repository::PgAccessLogRepository;
pub use pg_link_repository::PgLinkRepository;
